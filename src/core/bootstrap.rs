use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;

/// One-shot import of the legacy flat-file exam mirrors. The files are only
/// ever read; PostgreSQL is the single source of truth afterwards.
pub(crate) async fn import_legacy_exams(state: &AppState) -> anyhow::Result<()> {
    let data_dir = PathBuf::from(&state.settings().storage().data_dir);

    import_exam_list(state, &data_dir.join("allExams.json")).await?;
    import_current_olympiad(state, &data_dir.join("currentOlympiadExam.json")).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct LegacyExam {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "displayName", alias = "name")]
    display_name: String,
    #[serde(alias = "fileUrl")]
    file_url: String,
    #[serde(default, alias = "className", alias = "class")]
    class_name: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    chapter: String,
    #[serde(default)]
    questions: Vec<serde_json::Value>,
    #[serde(default)]
    answers: serde_json::Map<String, serde_json::Value>,
}

async fn import_exam_list(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let Some(raw) = read_if_present(path).await? else {
        return Ok(());
    };

    let entries: Vec<LegacyExam> = serde_json::from_str(&raw)
        .map_err(|err| anyhow::anyhow!("invalid legacy exam list {}: {err}", path.display()))?;

    let mut imported = 0usize;
    for entry in entries {
        let id = entry.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        if repositories::exams::find_by_id(state.db(), &id).await?.is_some() {
            continue;
        }

        repositories::exams::create(
            state.db(),
            repositories::exams::CreateExam {
                id: &id,
                display_name: &entry.display_name,
                file_url: &entry.file_url,
                class_name: &entry.class_name,
                subject: &entry.subject,
                chapter: &entry.chapter,
                questions: serde_json::Value::Array(entry.questions),
                answers: serde_json::Value::Object(entry.answers),
                created_at: primitive_now_utc(),
            },
        )
        .await?;
        imported += 1;
    }

    if imported > 0 {
        tracing::info!(count = imported, path = %path.display(), "Imported legacy exam entries");
    }

    Ok(())
}

async fn import_current_olympiad(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let Some(raw) = read_if_present(path).await? else {
        return Ok(());
    };

    if repositories::olympiad::current(state.db()).await?.is_some() {
        return Ok(());
    }

    let entry: LegacyExam = serde_json::from_str(&raw)
        .map_err(|err| anyhow::anyhow!("invalid legacy olympiad exam {}: {err}", path.display()))?;

    let id = entry.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    repositories::olympiad::replace(
        state.db(),
        repositories::olympiad::CreateOlympiadExam {
            id: &id,
            display_name: &entry.display_name,
            file_url: &entry.file_url,
            questions: serde_json::Value::Array(entry.questions),
            answers: serde_json::Value::Object(entry.answers),
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(path = %path.display(), "Imported legacy olympiad exam");

    Ok(())
}

async fn read_if_present(path: &Path) -> anyhow::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::anyhow!("failed to read {}: {err}", path.display())),
    }
}
