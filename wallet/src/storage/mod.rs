pub mod envelope;
pub mod paths;

pub use envelope::ChecksummedFile;
pub use paths::StorePaths;
