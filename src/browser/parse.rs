//! Listing markup parsing
//!
//! Folder listings render each sub-folder as `li.infolist-item a.infolist-link`.
//! File listings render one `tr.selector-file-contextual` per file, carrying the
//! remote path in the row `id` and the display name in the third cell.

use crate::error::{Error, Result};
use crate::types::RemoteFile;
use scraper::{Html, Selector};
use tracing::debug;

const FOLDER_SELECTOR: &str = "li.infolist-item a.infolist-link";
const FILE_ROW_SELECTOR: &str = "tr.selector-file-contextual";
const CELL_SELECTOR: &str = "td";

/// Index of the cell holding the display name
const NAME_CELL: usize = 2;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector '{}': {:?}", css, e)))
}

/// Extract sub-folder names from a folder listing
pub fn parse_folders(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let links = selector(FOLDER_SELECTOR)?;

    Ok(document
        .select(&links)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Extract file rows from a file listing
///
/// Rows without an `id` or with fewer than three cells are skipped.
pub fn parse_files(html: &str) -> Result<Vec<RemoteFile>> {
    let document = Html::parse_document(html);
    let rows = selector(FILE_ROW_SELECTOR)?;
    let cells = selector(CELL_SELECTOR)?;

    let mut files = Vec::new();
    for row in document.select(&rows) {
        let remote_path = match row.value().attr("id") {
            Some(id) if !id.trim().is_empty() => decode_entities(id.trim()),
            _ => {
                debug!("skipping file row without identifier");
                continue;
            }
        };

        let Some(name_cell) = row.select(&cells).nth(NAME_CELL) else {
            debug!(remote_path = %remote_path, "skipping file row with fewer than three cells");
            continue;
        };

        files.push(RemoteFile {
            remote_path,
            display_name: name_cell.text().collect::<String>().trim().to_string(),
        });
    }

    Ok(files)
}

/// Decode HTML character references left in already-parsed text
///
/// The portal escapes accented letters in row identifiers a second time
/// (`&amp;#243;`), so the parser's own decoding leaves `&#243;` behind.
/// Text without `&` is returned as-is; text containing markup is not touched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') || text.contains('<') {
        return text.to_string();
    }
    Html::parse_fragment(text)
        .root_element()
        .text()
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const FOLDER_LISTING: &str = r##"
        <ul class="infolist">
          <li class="infolist-item"><a class="infolist-link" href="#"> 2026 </a></li>
          <li class="infolist-item"><a class="infolist-link" href="#">2025</a></li>
          <li class="infolist-item"><a class="infolist-link" href="#">Informes</a></li>
          <li class="infolist-item"><a class="other" href="#">ignored</a></li>
          <li class="infolist-item"><a class="infolist-link" href="#">   </a></li>
        </ul>"##;

    const FILE_LISTING: &str = r#"
        <table><tbody>
          <tr class="selector-file-contextual" id="Post Operaci&amp;#243;n/Reportes/IEOD/2025/03_Marzo/05/AnexoA_IEOD.xlsx">
            <td><input type="checkbox"></td><td>icon</td><td> AnexoA_IEOD.xlsx </td><td>12 KB</td>
          </tr>
          <tr class="selector-file-contextual" id="Post Operación/Reportes/IEOD/2025/03_Marzo/05/Reporte.zip">
            <td></td><td></td><td>Reporte.zip</td>
          </tr>
          <tr class="selector-file-contextual">
            <td></td><td></td><td>no-id.xlsx</td>
          </tr>
          <tr class="selector-file-contextual" id="short/row.xlsx">
            <td></td><td>row.xlsx</td>
          </tr>
          <tr class="plain" id="other.xlsx"><td></td><td></td><td>other.xlsx</td></tr>
        </tbody></table>"#;

    #[test]
    fn test_parse_folders() {
        let folders = parse_folders(FOLDER_LISTING).unwrap();
        assert_eq!(folders, vec!["2026", "2025", "Informes"]);
    }

    #[test]
    fn test_parse_folders_empty_markup() {
        assert!(parse_folders("").unwrap().is_empty());
        assert!(parse_folders("<html><body>error</body></html>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_files_skips_incomplete_rows() {
        let files = parse_files(FILE_LISTING).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].display_name, "AnexoA_IEOD.xlsx");
        assert_eq!(files[1].display_name, "Reporte.zip");
    }

    #[test]
    fn test_parse_files_decodes_double_escaped_identifiers() {
        let files = parse_files(FILE_LISTING).unwrap();
        assert_eq!(
            files[0].remote_path,
            "Post Operación/Reportes/IEOD/2025/03_Marzo/05/AnexoA_IEOD.xlsx"
        );
        assert_eq!(
            files[1].remote_path,
            "Post Operación/Reportes/IEOD/2025/03_Marzo/05/Reporte.zip"
        );
    }

    #[test]
    fn test_names_are_decoded_only_once() {
        let folders = parse_folders(
            r#"<li class="infolist-item"><a class="infolist-link">Costos &amp;amp; Tarifas</a></li>"#,
        )
        .unwrap();
        assert_eq!(folders, vec!["Costos &amp; Tarifas"]);

        let files = parse_files(
            r#"<table><tr class="selector-file-contextual" id="IEOD/AnexoA_R&amp;amp;D.xlsx">
                 <td></td><td></td><td>AnexoA_R&amp;amp;D.xlsx</td>
               </tr></table>"#,
        )
        .unwrap();
        assert_eq!(files[0].display_name, "AnexoA_R&amp;D.xlsx");
        assert_eq!(files[0].remote_path, "IEOD/AnexoA_R&D.xlsx");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Operaci&#243;n"), "Operación");
        assert_eq!(decode_entities("D&#237;a 05"), "Día 05");
        // Broader than the two accents the portal is known to use
        assert_eq!(decode_entities("Espa&ntilde;a &amp; Cia"), "España & Cia");
        assert_eq!(decode_entities("plain"), "plain");
        assert_eq!(decode_entities("a < b &amp; c"), "a < b &amp; c");
    }
}
