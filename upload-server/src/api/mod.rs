use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use domain_upload::exception::UploadException;
use serde::{Deserialize, Serialize};

pub mod dtos;
pub mod upload;

/// Envelope of every json response.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBase<T> {
    pub status: i32,
    pub message: String,
    pub content: Option<T>,
}

impl<T> ResponseBase<T> {
    pub fn new(status: i32, message: &str, content: Option<T>) -> Self {
        Self {
            status,
            message: message.to_string(),
            content,
        }
    }

    pub fn ok(content: Option<T>) -> Self {
        Self::new(200, "Ok", content)
    }

    pub fn err(status: i32, message: &str) -> Self {
        Self::new(status, message, None)
    }
}

/// An [`UploadException`] on its way to the client.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub UploadException);

pub type ApiResult<T> = Result<web::Json<ResponseBase<T>>, ApiError>;

pub fn ok<T>(content: T) -> ApiResult<T> {
    Ok(web::Json(ResponseBase::ok(Some(content))))
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        }
        let mut body = ResponseBase::err(status.as_u16() as i32, &self.0.to_string());
        // Clients resume from the missing chunks instead of probing again.
        if let UploadException::IncompleteUpload { missing, .. } = &self.0 {
            body.content = Some(missing.clone());
        }
        HttpResponse::build(status).json(body)
    }
}

