use super::AIModel;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ImageCaptionInput {
    pub image_file_path: PathBuf,
    pub prompt: Option<String>,
}

pub type ImageCaptionOutput = String;
pub type ImageCaptionModel = AIModel<ImageCaptionInput, ImageCaptionOutput>;
