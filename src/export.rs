//! Printable export of the rendered preview.
//!
//! The rendered HTML snapshot is embedded unmodified in a standalone A4
//! document with print styles and a MathJax loader. Opening it in a browser
//! and printing (or "Save as PDF") produces the final document.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("saved {path} but could not open a browser: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const PRINT_STYLES: &str = r"
      @page { size: A4; margin: 0; }
      body { margin: 0; padding: 0; background: #ccc; }
      .page {
        width: 210mm;
        min-height: 297mm;
        padding: 30mm 20mm;
        margin: 10mm auto;
        background: white;
        box-shadow: 0 0 10px rgba(0, 0, 0, 0.1);
        box-sizing: border-box;
      }
      .content { font-size: 12pt; line-height: 1.6; max-width: 170mm; margin: 0 auto; }
      @media print {
        body { background: none; }
        .page { margin: 0; box-shadow: none; break-after: page; }
        .content { font-family: 'Microsoft YaHei', sans-serif; }
      }
      [data-math-style='display'] { display: block; overflow-x: auto; margin: 1em 0; text-align: center; }
      pre { background-color: #f5f5f5; padding: 1em; border-radius: 4px; overflow-x: auto; font-size: 0.9em; }
      img { max-width: 100%; height: auto; }
";

const MATHJAX_CONFIG: &str = r"
      window.MathJax = {
        tex: {
          inlineMath: [['\\(', '\\)']],
          displayMath: [['\\[', '\\]']],
          processEscapes: true,
          processEnvironments: true
        },
        options: { skipHtmlTags: ['script', 'noscript', 'style', 'textarea', 'pre'] }
      };
";

// The renderer leaves TeX as bare span text; give MathJax delimiters to find.
const MATH_DELIMITERS: &str = r"
      document.querySelectorAll('[data-math-style]').forEach(function (el) {
        var display = el.getAttribute('data-math-style') === 'display';
        el.textContent = (display ? '\\[' : '\\(') + el.textContent + (display ? '\\]' : '\\)');
      });
";

const MATHJAX_URL: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// Where an export of `source` goes by default: `<stem>.print.html` beside it.
pub fn default_export_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string());
    source.with_file_name(format!("{stem}.print.html"))
}

/// Build the printable document around an HTML snapshot.
pub fn print_document(snapshot_html: &str, title: &str) -> String {
    let title = escape_title(title);
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"UTF-8\">\n    \
         <title>{title}</title>\n    <style>{PRINT_STYLES}    </style>\n    \
         <script>{MATHJAX_CONFIG}    </script>\n  </head>\n  <body>\n    \
         <div class=\"page\">\n      <div class=\"content\">\n{snapshot_html}\n      \
         </div>\n    </div>\n    <script>{MATH_DELIMITERS}    </script>\n    \
         <script src=\"{MATHJAX_URL}\"></script>\n  </body>\n</html>\n"
    )
}

fn escape_title(title: &str) -> String {
    title
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write the printable document for `snapshot_html` to `path`.
///
/// # Errors
/// Returns [`ExportError::Write`] if the file cannot be written.
pub fn write_export(snapshot_html: &str, title: &str, path: &Path) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, print_document(snapshot_html, title)).map_err(write_err)?;
    info!(path = %path.display(), bytes = snapshot_html.len(), "export written");
    Ok(())
}

/// Write the export and, if asked, open it in the default browser.
///
/// # Errors
/// [`ExportError::Write`] if nothing was written, [`ExportError::Open`] if
/// the file was written but the browser could not be launched.
pub fn export(
    snapshot_html: &str,
    title: &str,
    path: &Path,
    open_in_browser: bool,
) -> Result<(), ExportError> {
    write_export(snapshot_html, title, path)?;
    if open_in_browser {
        open_path(path).map_err(|source| {
            warn!(path = %path.display(), %source, "could not open export");
            ExportError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }
    Ok(())
}

fn open_path(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?
            .wait()?;
        Ok(())
    }
}
