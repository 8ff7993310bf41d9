pub mod encrypt;
pub mod merge;
pub mod split;
