use crate::pdf::PdfDocument;
use crate::validate;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct EncryptOutcome {
    pub output: PathBuf,
    pub was_encrypted: bool,
    pub encrypted: bool,
}

/// Replace the password of `input`.
///
/// An encrypted source is unlocked with `current_password` first. An empty or
/// missing `new_password` leaves the result unencrypted. The result overwrites
/// `input` unless `output` is given.
pub fn encrypt_pdf<P: AsRef<Path>>(
    input: P,
    current_password: Option<&str>,
    new_password: Option<&str>,
    output: Option<&Path>,
) -> Result<EncryptOutcome> {
    let input = input.as_ref();
    validate::ensure_pdf_input(input)?;
    let output = output.unwrap_or(input);

    let mut doc = PdfDocument::open(input)?;
    let was_encrypted = doc.is_encrypted();
    if was_encrypted {
        doc.decrypt(current_password.unwrap_or_default())?;
    }

    let new_password = new_password.filter(|p| !p.is_empty());
    if let Some(password) = new_password {
        doc.encrypt(password, password)?;
    }

    info!(
        source = %input.display(),
        output = %output.display(),
        was_encrypted,
        encrypted = new_password.is_some(),
        "updating password"
    );

    PdfDocument::save(&mut doc.doc, output)?;

    Ok(EncryptOutcome {
        output: output.to_path_buf(),
        was_encrypted,
        encrypted: new_password.is_some(),
    })
}

pub fn run<P: AsRef<Path>>(
    input: P,
    current_password: Option<&str>,
    new_password: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let outcome = encrypt_pdf(input, current_password, new_password, output)?;

    if outcome.encrypted {
        println!("The PDF file was successfully encrypted: {}", outcome.output.display());
    } else if outcome.was_encrypted {
        println!("The password was removed: {}", outcome.output.display());
    } else {
        println!("No password set, file left unencrypted: {}", outcome.output.display());
    }

    Ok(())
}
