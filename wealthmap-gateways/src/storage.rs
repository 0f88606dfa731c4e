use reqwest::{header::CONTENT_TYPE, Method};
use wealthmap_core::{
    entities::Url,
    gateways::storage::{LogoStorage, Upload},
};

use crate::backend::BackendClient;

/// Object names consist of the company id and a sanitized file name.
fn object_path(company_id: &str, file_name: &str) -> String {
    let file_name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let file_name = file_name.trim_start_matches('.');
    let file_name = if file_name.is_empty() { "logo" } else { file_name };
    format!("{company_id}/{file_name}")
}

impl BackendClient {
    fn public_object_url(&self, path: &str) -> String {
        self.endpoint(&format!(
            "storage/v1/object/public/{}/{path}",
            self.logo_bucket
        ))
    }
}

impl LogoStorage for BackendClient {
    fn upload_logo(&self, company_id: &str, upload: Upload) -> anyhow::Result<Url> {
        let Upload {
            file_name,
            content_type,
            bytes,
        } = upload;
        let path = object_path(company_id, &file_name);
        log::debug!("Uploading {} bytes to {path}", bytes.len());
        let response = self
            .request(
                Method::POST,
                &format!("storage/v1/object/{}/{path}", self.logo_bucket),
            )
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()?;
        Self::check(response)?;
        Ok(self.public_object_url(&path).parse()?)
    }
}
