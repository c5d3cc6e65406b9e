//! File classification
//!
//! Maps listed files onto retrieval strategies by naming convention. Names the
//! conventions do not recognise produce no task at all.

use crate::config::NamingConfig;
use crate::types::{RemoteFile, RetrievalTask, Strategy};
use std::path::Path;

/// Strategy for a file listed in the primary tree
///
/// - `<direct_prefix>*<spreadsheet>` → [`Strategy::Direct`]
/// - `*<archive>` → [`Strategy::ArchiveExtract`]
/// - excluded extensions and anything else → `None`
///
/// # Examples
///
/// ```
/// use ieod_dl::classify::classify_primary;
/// use ieod_dl::config::NamingConfig;
/// use ieod_dl::types::Strategy;
///
/// let naming = NamingConfig::default();
/// assert_eq!(classify_primary("AnexoA_IEOD.xlsx", &naming), Some(Strategy::Direct));
/// assert_eq!(classify_primary("Reporte.zip", &naming), Some(Strategy::ArchiveExtract));
/// assert_eq!(classify_primary("informe.pdf", &naming), None);
/// ```
#[must_use]
pub fn classify_primary(display_name: &str, naming: &NamingConfig) -> Option<Strategy> {
    let name = display_name.to_lowercase();

    if naming
        .excluded_extensions
        .iter()
        .any(|ext| name.ends_with(&ext.to_lowercase()))
    {
        return None;
    }

    if name.starts_with(&naming.direct_prefix.to_lowercase())
        && name.ends_with(&naming.spreadsheet_extension.to_lowercase())
    {
        return Some(Strategy::Direct);
    }

    if name.ends_with(&naming.archive_extension.to_lowercase()) {
        return Some(Strategy::ArchiveExtract);
    }

    None
}

/// Build the task list for one day folder
///
/// Secondary files arrive pre-filtered by the walker and always become
/// [`Strategy::SecondaryDirect`] tasks.
pub fn plan_day(
    primary: Vec<RemoteFile>,
    secondary: Vec<RemoteFile>,
    destination: &Path,
    naming: &NamingConfig,
) -> Vec<RetrievalTask> {
    let primary_tasks = primary.into_iter().filter_map(|file| {
        classify_primary(&file.display_name, naming).map(|strategy| RetrievalTask {
            strategy,
            file,
            destination: destination.to_path_buf(),
        })
    });

    let secondary_tasks = secondary.into_iter().map(|file| RetrievalTask {
        strategy: Strategy::SecondaryDirect,
        file,
        destination: destination.to_path_buf(),
    });

    primary_tasks.chain(secondary_tasks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> RemoteFile {
        RemoteFile {
            remote_path: format!("Post Operación/Reportes/IEOD/2025/03_Marzo/05/{}", name),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_classify_direct_spreadsheet() {
        let naming = NamingConfig::default();
        assert_eq!(classify_primary("AnexoA_IEOD.xlsx", &naming), Some(Strategy::Direct));
        assert_eq!(classify_primary("ANEXOA_2025.XLSX", &naming), Some(Strategy::Direct));
    }

    #[test]
    fn test_classify_archive() {
        let naming = NamingConfig::default();
        assert_eq!(classify_primary("Reporte.zip", &naming), Some(Strategy::ArchiveExtract));
        assert_eq!(classify_primary("AnexoA.ZIP", &naming), Some(Strategy::ArchiveExtract));
    }

    #[test]
    fn test_classify_excluded_and_unmatched() {
        let naming = NamingConfig::default();
        assert_eq!(classify_primary("informe.pdf", &naming), None);
        assert_eq!(classify_primary("AnexoA.PDF", &naming), None);
        assert_eq!(classify_primary("AnexoB_IEOD.xlsx", &naming), None);
        assert_eq!(classify_primary("notas.txt", &naming), None);
    }

    #[test]
    fn test_classify_respects_custom_conventions() {
        let naming = NamingConfig {
            direct_prefix: "resumen".into(),
            spreadsheet_extension: ".xls".into(),
            archive_extension: ".7z".into(),
            excluded_extensions: vec![],
            ..Default::default()
        };
        assert_eq!(classify_primary("Resumen_01.xls", &naming), Some(Strategy::Direct));
        assert_eq!(classify_primary("pack.7z", &naming), Some(Strategy::ArchiveExtract));
        assert_eq!(classify_primary("pack.zip", &naming), None);
    }

    #[test]
    fn test_plan_day_mixes_both_trees() {
        let naming = NamingConfig::default();
        let dest = Path::new("/out/05");
        let tasks = plan_day(
            vec![
                file("AnexoA_IEOD.xlsx"),
                file("Reporte.zip"),
                file("informe.pdf"),
                file("leeme.txt"),
            ],
            vec![file("Anexo1_Despacho.xlsx")],
            dest,
            &naming,
        );

        let strategies: Vec<Strategy> = tasks.iter().map(|t| t.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                Strategy::Direct,
                Strategy::ArchiveExtract,
                Strategy::SecondaryDirect
            ]
        );
        assert!(tasks.iter().all(|t| t.destination == dest));
    }

    #[test]
    fn test_plan_day_secondary_is_never_reclassified() {
        let naming = NamingConfig::default();
        let tasks = plan_day(vec![], vec![file("whatever.pdf")], Path::new("/out"), &naming);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].strategy, Strategy::SecondaryDirect);
    }

    #[test]
    fn test_plan_day_empty() {
        let naming = NamingConfig::default();
        assert!(plan_day(vec![], vec![], Path::new("/out"), &naming).is_empty());
    }
}
