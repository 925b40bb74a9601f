pub mod documents;
pub mod download;
pub mod files;
pub mod forms;
pub mod lessons;
pub mod sections;
