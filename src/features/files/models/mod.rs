mod file;

pub use file::{NewUploadedFile, UploadedFile};
