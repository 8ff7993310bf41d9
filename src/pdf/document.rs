use anyhow::{anyhow, Context, Result};
use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, StringFormat,
};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const KEY_LENGTH: usize = 128;

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;

        // lopdf only decrypts on load when the user password is empty
        if doc.is_encrypted() && doc.encryption_state.is_none() {
            anyhow::bail!("PDF is password protected: {}", path.display());
        }

        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    /// Open a document whose pages will be copied elsewhere. Encryption that
    /// lopdf already undid while loading is dropped, so copies are written plain.
    pub fn open_unlocked<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut doc = Self::open(path)?;
        doc.decrypt("")?;
        Ok(doc)
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Copy the given pages into a new document, keeping document order
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let all_pages = self.page_ids();
        let total = all_pages.len() as u32;

        let keep: BTreeSet<u32> = pages.iter().copied().collect();
        if let Some(&page) = keep.iter().find(|&&page| page == 0 || page > total) {
            anyhow::bail!(
                "Page {} is out of range (1-{}) in {}",
                page,
                total,
                self.path.display()
            );
        }

        let pages_to_delete: Vec<u32> = all_pages
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| !keep.contains(num))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Remove encryption. Either the owner or the user password is accepted.
    pub fn decrypt(&mut self, password: &str) -> Result<()> {
        if !self.doc.is_encrypted() {
            return Ok(());
        }

        self.doc
            .authenticate_password(password)
            .map_err(|_| anyhow!("Incorrect password for {}", self.path.display()))?;

        if self.doc.encryption_state.take().is_some() {
            // Objects were decrypted while loading, only the dictionary is left
            let dict_id = self
                .doc
                .trailer
                .remove(b"Encrypt")
                .and_then(|obj| obj.as_reference().ok());
            if let Some(id) = dict_id {
                self.doc.objects.remove(&id);
            }
        } else {
            self.doc
                .decrypt(password)
                .with_context(|| format!("Failed to decrypt {}", self.path.display()))?;
            self.doc.encryption_state = None;
        }

        Ok(())
    }

    /// Encrypt with RC4 (128-bit key), granting every permission to the user.
    pub fn encrypt(&mut self, user_password: &str, owner_password: &str) -> Result<()> {
        if self.doc.is_encrypted() {
            anyhow::bail!("PDF is already encrypted: {}", self.path.display());
        }

        // The file identifier salts the encryption key
        if self.doc.trailer.get(b"ID").is_err() {
            let id = Object::String(self.file_id(), StringFormat::Hexadecimal);
            self.doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));
        }

        let state = EncryptionState::try_from(EncryptionVersion::V2 {
            document: &self.doc,
            owner_password,
            user_password,
            key_length: KEY_LENGTH,
            permissions: Permissions::default(),
        })
        .with_context(|| format!("Failed to prepare encryption for {}", self.path.display()))?;

        self.doc
            .encrypt(&state)
            .with_context(|| format!("Failed to encrypt {}", self.path.display()))?;
        Ok(())
    }

    fn file_id(&self) -> Vec<u8> {
        let mut id = Vec::with_capacity(16);
        for seed in 0u8..2 {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            self.path.hash(&mut hasher);
            SystemTime::now().hash(&mut hasher);
            id.extend_from_slice(&hasher.finish().to_be_bytes());
        }
        id
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}
