//! Listing markup and archive fixtures shaped like the portal's responses

use std::io::Write;

/// Folder listing markup for the given sub-folder names
pub fn folder_listing(names: &[&str]) -> String {
    let items: String = names
        .iter()
        .map(|name| {
            format!(
                r##"<li class="infolist-item"><a class="infolist-link" href="#">{}</a></li>"##,
                name
            )
        })
        .collect();
    format!(
        r#"<div class="browser"><ul class="infolist">{}</ul></div>"#,
        items
    )
}

/// File listing markup for files stored under `folder`
pub fn file_listing(folder: &str, names: &[&str]) -> String {
    let rows: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<tr class="selector-file-contextual" id="{folder}{name}"><td><input type="checkbox"></td><td><i class="icon"></i></td><td>{name}</td><td>24 KB</td></tr>"#
            )
        })
        .collect();
    format!(
        r#"<table class="table"><thead><tr><th></th><th></th><th>Nombre</th><th>Tamaño</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

/// In-memory ZIP archive holding `entries` in order
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
