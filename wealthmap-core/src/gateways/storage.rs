use crate::entities::Url;

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub trait LogoStorage {
    /// Stores the logo of a company and returns its public URL.
    fn upload_logo(&self, company_id: &str, upload: Upload) -> anyhow::Result<Url>;
}
