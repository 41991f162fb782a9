use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::collections::HashMap;

use crate::error::Error;
use crate::models::question::{KindFields, OptionInput, OptionInsert, VideoInput};
use crate::services::media::FilePart;

/// A drained multipart request: text fields by name, file parts in arrival
/// order. Clients send `options` and `videos` as JSON strings next to the
/// binary parts.
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<FilePart>,
}

pub async fn read_form(payload: &mut Multipart) -> Result<MultipartForm, Error> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_owned();
        let filename = field.content_disposition().get_filename().map(ToOwned::to_owned);
        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            content.extend_from_slice(&chunk);
        }
        match filename {
            Some(filename) => {
                let content_type = field.content_type().cloned().unwrap_or(mime::APPLICATION_OCTET_STREAM);
                files.push(FilePart {
                    filename,
                    content_type,
                    content: content.into(),
                });
            }
            None => {
                fields.insert(name, String::from_utf8_lossy(&content).into_owned());
            }
        }
    }
    Ok(MultipartForm { fields, files })
}

impl MultipartForm {
    pub fn take_files(&mut self) -> Vec<FilePart> {
        std::mem::take(&mut self.files)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<String, Error> {
        self.text(name).ok_or_else(|| Error::Validation(format!("{} is required", name)))
    }

    pub fn int(&self, name: &str) -> Result<i32, Error> {
        self.require(name)?
            .parse()
            .map_err(|_| Error::Validation(format!("{} must be an integer", name)))
    }

    pub fn number_opt(&self, name: &str) -> Result<Option<f64>, Error> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| Error::Validation(format!("{} must be a number", name))),
        }
    }

    pub fn bool_or(&self, name: &str, fallback: bool) -> Result<bool, Error> {
        match self.fields.get(name).map(String::as_str) {
            None => Ok(fallback),
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") => Ok(false),
            Some(_) => Err(Error::Validation(format!("{} must be a boolean", name))),
        }
    }

    pub fn options(&self) -> Result<Vec<OptionInsert>, Error> {
        match self.fields.get("options") {
            None => Ok(Vec::new()),
            Some(raw) => {
                let inputs: Vec<OptionInput> = serde_json::from_str(raw)?;
                Ok(inputs.into_iter().map(Into::into).collect())
            }
        }
    }

    pub fn videos(&self) -> Result<Option<VideoInput>, Error> {
        match self.fields.get("videos") {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str::<VideoInput>(raw)?)),
        }
    }

    pub fn kind_fields(&self) -> Result<KindFields, Error> {
        Ok(KindFields {
            min_value: self.number_opt("minValue")?,
            max_value: self.number_opt("maxValue")?,
            correct_value: self.number_opt("correctValue")?,
            correct_answer: self.text("correctAnswer"),
            correct_latitude: self.number_opt("correctLatitude")?,
            correct_longitude: self.number_opt("correctLongitude")?,
        })
    }
}
