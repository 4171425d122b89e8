//! Drive handlers: listing, folders, upload/download, rename, delete,
//! breadcrumbs.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use drive_core::error::AppError;
use drive_core::types::{FileId, FolderId};
use drive_entity::file::File;
use drive_entity::folder::Folder;
use drive_entity::node::{DriveItem, DriveListing};
use drive_service::UploadRequest;

use crate::dto::request::{CreateFolderRequest, DeleteQuery, ListQuery, RenameRequest};
use crate::dto::response::{BreadcrumbsResponse, DeleteResponse};
use crate::error::ApiError;
use crate::extractors::{content_disposition, parse_kind, parse_uuid};
use crate::state::AppState;

/// GET /drive/list?parent_id=...
pub async fn list_children(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DriveListing>, ApiError> {
    let parent_id = FolderId::parse_optional(query.parent_id.as_deref())?;
    let listing = state.engine.list_children(parent_id).await?;
    Ok(Json(listing))
}

/// POST /drive/folder
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    let parent_id = FolderId::parse_optional(req.parent_id.as_deref())?;
    let folder = state.engine.create_folder(&req.name, parent_id).await?;
    Ok(Json(folder))
}

/// POST /drive/upload (multipart: `parent_id`, `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<File>, ApiError> {
    let mut parent_id: Option<FolderId> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "parent_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                parent_id = FolderId::parse_optional(Some(&text))?;
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                mime_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let name = file_name.ok_or_else(|| AppError::validation("file name is required"))?;

    let file = state
        .engine
        .upload_file(UploadRequest {
            parent_id,
            name,
            data,
            mime_type,
        })
        .await?;

    Ok(Json(file))
}

/// GET /drive/download/{file_id}
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let file_id = FileId::parse(&file_id)?;
    let download = state.engine.download_file(file_id).await?;

    let headers = [
        (header::CONTENT_TYPE, download.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(download.filename()),
        ),
        (header::CONTENT_LENGTH, download.content_length.to_string()),
    ];

    Ok((headers, Body::from_stream(download.stream)).into_response())
}

/// PATCH /drive/rename
pub async fn rename_item(
    State(state): State<AppState>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<DriveItem>, ApiError> {
    let kind = parse_kind(Some(&req.kind))?;
    let id = parse_uuid(&req.id)?;
    let item = state.engine.rename_item(kind, id, &req.name).await?;
    Ok(Json(item))
}

/// DELETE /drive/item/{item_id}?type=file|folder
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let kind = parse_kind(query.kind.as_deref())?;
    let id = parse_uuid(&item_id)?;
    let report = state.engine.delete_item(kind, id).await?;
    Ok(Json(report.into()))
}

/// GET /drive/breadcrumbs/{folder_id}
///
/// An unknown folder yields an empty chain rather than 404.
pub async fn breadcrumbs(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Result<Json<BreadcrumbsResponse>, ApiError> {
    let folder_id = FolderId::parse(&folder_id)?;
    let breadcrumbs = match state.engine.breadcrumbs(folder_id).await {
        Ok(chain) => chain,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(BreadcrumbsResponse { breadcrumbs }))
}
