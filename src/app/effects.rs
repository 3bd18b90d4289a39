use tracing::{info, warn};

use crate::app::model::ALERT_TOAST_MS;
use crate::app::{App, Message, Model, ToastLevel};
use crate::clipboard::Clipboard;
use crate::export::ExportError;

impl App {
    /// Run the I/O a message asks for after `update` has applied it.
    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        clipboard: &mut impl Clipboard,
        msg: &Message,
    ) {
        match msg {
            Message::Save => save(model),
            Message::CopyConverted => copy_converted(model, clipboard),
            Message::Export => export(model),
            _ => {}
        }
    }
}

fn save(model: &mut Model) {
    match model.buffer.save(&model.file_path) {
        Ok(()) => {
            info!(path = %model.file_path.display(), "saved");
            model.show_toast(ToastLevel::Info, format!("Saved {}", model.file_name()));
        }
        Err(err) => {
            warn!(%err, "save failed");
            model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
        }
    }
}

fn copy_converted(model: &mut Model, clipboard: &mut impl Clipboard) {
    let text = model.copy_text();
    match clipboard.copy(&text) {
        Ok(()) => {
            info!(chars = text.chars().count(), "copied converted markdown");
            model.show_toast(ToastLevel::Info, "Copied!");
        }
        Err(err) => {
            warn!(%err, "copy failed");
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}

fn export(model: &mut Model) {
    let title = model.document_title();
    let path = model.export_path.clone();
    match crate::export::export(&model.rendered.html, &title, &path, model.open_export) {
        Ok(()) if model.open_export => model.show_toast_for(
            ToastLevel::Info,
            "Print the page and choose \"Save as PDF\"",
            ALERT_TOAST_MS,
        ),
        Ok(()) => model.show_toast_for(
            ToastLevel::Info,
            format!("Exported {}", path.display()),
            ALERT_TOAST_MS,
        ),
        Err(err @ ExportError::Open { .. }) => {
            model.show_toast(ToastLevel::Warning, err.to_string());
        }
        Err(err) => {
            model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
        }
    }
}
