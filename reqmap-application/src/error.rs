use reqmap_core::{
    gateways::{render, source},
    repositories::Error as RepoError,
    usecases::Error as BError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Business(#[from] BError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> AppError {
        AppError::Business(err.into())
    }
}

impl From<source::Error> for AppError {
    fn from(err: source::Error) -> AppError {
        AppError::Business(err.into())
    }
}

impl From<render::Error> for AppError {
    fn from(err: render::Error) -> AppError {
        AppError::Business(err.into())
    }
}
