use actix_easy_multipart::{tempfile::Tempfile, MultipartForm};
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{post, web, HttpResponse};
use domain_upload::{
    command::{MergeCommand, StageChunkCommand},
    exception::UploadException,
    model::vo::{ContentHash, FileName},
};
use tokio_util::io::ReaderStream;

use super::dtos::*;
use super::{ok, ApiError, ApiResult};
use crate::infrastructure::ServiceProvider;

fn parse_file(md5: &str, file_name: &str) -> Result<(ContentHash, FileName), ApiError> {
    Ok((md5.parse()?, file_name.parse()?))
}

/// Malformed json bodies are reported in the response envelope like any other bad request.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|e, _| ApiError::from(UploadException::invalid(e.to_string())).into())
}

#[post("/check")]
pub async fn check(
    sp: web::Data<ServiceProvider>,
    data: web::Json<FileRequest>,
) -> ApiResult<CheckResponse> {
    let (hash, file_name) = parse_file(&data.md5, &data.file_name)?;
    let probed = sp.upload_service().probe(&hash, &file_name).await?;
    ok(probed.into())
}

pub async fn upload_chunk(
    sp: web::Data<ServiceProvider>,
    form: MultipartForm<UploadChunkForm>,
) -> ApiResult<UploadChunkResponse> {
    let UploadChunkForm { md5, index, data } = form.0;
    let hash: ContentHash = md5.0.parse()?;
    let [chunk]: [Tempfile; 1] = data.try_into().map_err(|files: Vec<Tempfile>| {
        UploadException::invalid(format!(
            "expected exactly one file in field data, got {}",
            files.len()
        ))
    })?;
    tracing::debug!("Received chunk {} of {hash}, {} bytes.", index.0, chunk.size);
    let staged = sp
        .upload_service()
        .stage_chunk(StageChunkCommand {
            hash: hash.clone(),
            index: index.0,
            source: chunk.file.path().to_path_buf(),
        })
        .await?;
    ok(UploadChunkResponse {
        md5: hash.to_string(),
        chunk: staged,
    })
}

#[post("/merge")]
pub async fn merge(
    sp: web::Data<ServiceProvider>,
    data: web::Json<MergeRequest>,
) -> ApiResult<MergeResponse> {
    let MergeRequest {
        md5,
        file_name,
        total,
    } = data.0;
    let (hash, file_name) = parse_file(&md5, &file_name)?;
    let merged = sp
        .merge_service()
        .merge(MergeCommand {
            hash,
            file_name,
            expected_total: total,
        })
        .await?;
    ok(merged.into())
}

#[post("/link")]
pub async fn link(
    sp: web::Data<ServiceProvider>,
    data: web::Json<FileRequest>,
) -> ApiResult<LinkResponse> {
    let (hash, file_name) = parse_file(&data.md5, &data.file_name)?;
    let names = sp.alias_service().link(&hash, &file_name).await?;
    ok(LinkResponse {
        md5: hash.to_string(),
        file_names: names.iter().map(ToString::to_string).collect(),
    })
}

pub async fn delete(
    sp: web::Data<ServiceProvider>,
    data: web::Json<FileRequest>,
) -> ApiResult<DeleteResponse> {
    let (hash, file_name) = parse_file(&data.md5, &data.file_name)?;
    let removal = sp.alias_service().remove(&hash, &file_name).await?;
    ok(DeleteResponse::new(hash.to_string(), &file_name, removal))
}

pub async fn list_files(sp: web::Data<ServiceProvider>) -> ApiResult<Vec<FileEntry>> {
    let stored = sp.artifact_service().list().await?;
    ok(stored.into_iter().map(FileEntry::from).collect())
}

pub async fn download(
    sp: web::Data<ServiceProvider>,
    data: web::Json<FileRequest>,
) -> Result<HttpResponse, ApiError> {
    let (hash, file_name) = parse_file(&data.md5, &data.file_name)?;
    let artifact = sp.artifact_service().fetch(&hash, &file_name).await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: artifact.download_name.as_str().as_bytes().to_vec(),
        })],
    };
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(disposition)
        .no_chunking(artifact.len)
        .streaming(ReaderStream::new(artifact.file)))
}
