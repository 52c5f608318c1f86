//! Multipart form parsing for the admin endpoints

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use media::UploadedFile;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};

/// A fully read multipart body: text fields and files by field name.
///
/// Field lookups accept both the snake_case name and its camelCase form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;

                    // An empty file input is sent with no name and no content
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    form.files.entry(name).or_default().push(UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    fn lookup<'a, V>(map: &'a HashMap<String, V>, name: &str) -> Option<&'a V> {
        map.get(name).or_else(|| map.get(&camel_case(name)))
    }

    /// Trimmed text field, `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<String> {
        Self::lookup(&self.fields, name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn has(&self, name: &str) -> bool {
        Self::lookup(&self.fields, name).is_some()
    }

    pub fn parse<T: FromStr>(&self, name: &str, label: &str) -> ApiResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| ApiError::Validation(format!("{} is not a valid value", label)))
            })
            .transpose()
    }

    /// Checkbox-style boolean: true/false, 1/0, on/off, yes/no
    pub fn bool(&self, name: &str) -> ApiResult<Option<bool>> {
        match self.text(name).map(|v| v.to_ascii_lowercase()).as_deref() {
            None => Ok(None),
            Some("true" | "1" | "on" | "yes") => Ok(Some(true)),
            Some("false" | "0" | "off" | "no") => Ok(Some(false)),
            Some(_) => Err(ApiError::Validation(format!(
                "{} must be true or false",
                name
            ))),
        }
    }

    pub fn json<T: DeserializeOwned>(&self, name: &str) -> ApiResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|_| ApiError::Validation(format!("{} must be valid JSON", name)))
            })
            .transpose()
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files
            .remove(name)
            .or_else(|| self.files.remove(&camel_case(name)))
            .unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.take_files(name).into_iter().next()
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        Self::read(multipart).await
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn form(fields: &[(&str, &str)]) -> MultipartForm {
        MultipartForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }

    #[test]
    fn test_text_lookup_accepts_camel_case() {
        let form = form(&[("compareAtPrice", " 12.50 "), ("name", "  ")]);
        assert_eq!(form.text("compare_at_price").as_deref(), Some("12.50"));
        assert_eq!(form.text("name"), None);
        assert!(form.has("name"));
    }

    #[test]
    fn test_parse_numbers_and_bools() {
        let form = form(&[("price", "19.99"), ("stock", "ten"), ("is_active", "on")]);
        assert_eq!(
            form.parse::<Decimal>("price", "Price").unwrap(),
            Some(Decimal::new(1999, 2))
        );
        assert!(form.parse::<i32>("stock", "Stock").is_err());
        assert_eq!(form.parse::<i32>("sort_order", "Sort order").unwrap(), None);
        assert_eq!(form.bool("is_active").unwrap(), Some(true));
        assert_eq!(form.bool("is_featured").unwrap(), None);
    }

    #[test]
    fn test_json_field() {
        let form = form(&[("ids", r#"["a","b"]"#), ("bad", "{")]);
        assert_eq!(
            form.json::<Vec<String>>("ids").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(form.json::<Vec<String>>("bad").is_err());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("keep_images"), "keepImages");
        assert_eq!(camel_case("image"), "image");
    }
}
