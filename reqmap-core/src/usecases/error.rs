use crate::{
    gateways::{render, source},
    repositories,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The start date {from} is after the end date {to}")]
    DateRange { from: time::Date, to: time::Date },
    #[error(transparent)]
    Source(#[from] source::Error),
    #[error(transparent)]
    Render(#[from] render::Error),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}
