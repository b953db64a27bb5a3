use thiserror::Error;

use crate::model::note::NoteParseError;
use crate::model::scale::ScaleParseError;
use crate::model::session::SessionReportError;
use crate::model::settings::SettingsError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Note(#[from] NoteParseError),
    #[error(transparent)]
    Scale(#[from] ScaleParseError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Report(#[from] SessionReportError),
}
