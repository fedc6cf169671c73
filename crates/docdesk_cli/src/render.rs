//! Plain-text rendering of store state for the terminal.

use docdesk_client::HealthStatus;
use docdesk_core::{Document, Notice, NoticeLevel, QueryHistoryEntry};

pub fn document_table(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No documents.".to_string();
    }
    let mut out = format!(
        "{:<38} {:<11} {:>6} {:>7} {:>10}  {}\n",
        "ID", "STATUS", "PAGES", "CHUNKS", "SIZE", "FILENAME"
    );
    for doc in documents {
        out.push_str(&format!(
            "{:<38} {:<11} {:>6} {:>7} {:>10}  {}\n",
            doc.document_id,
            doc.status.to_string(),
            doc.pages,
            doc.chunk_count,
            format_size(doc.file_size),
            doc.filename
        ));
    }
    out
}

pub fn document_detail(doc: &Document) -> String {
    format!(
        "id:        {}\nfile:      {}\nsize:      {}\nuploaded:  {}\nstatus:    {}\npages:     {}\nchunks:    {}",
        doc.document_id,
        doc.filename,
        format_size(doc.file_size),
        doc.upload_time,
        doc.status,
        doc.pages,
        doc.chunk_count
    )
}

pub fn transcript(history: &[QueryHistoryEntry]) -> String {
    history
        .iter()
        .map(|entry| {
            let answer = entry
                .response
                .answer()
                .map(str::to_string)
                .unwrap_or_else(|| entry.response.as_json().to_string());
            format!(
                "[{}] Q: {}\nA: {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.question,
                answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("ok: {}", notice.text),
        NoticeLevel::Error => format!("error: {}", notice.text),
    }
}

pub fn progress(percent: u8) -> String {
    const WIDTH: usize = 30;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!(
        "uploading [{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        percent
    )
}

pub fn health(status: &HealthStatus) -> String {
    let mut out = format!("service: {}", status.status);
    for (name, state) in &status.services {
        let state = state
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| state.to_string());
        out.push_str(&format!("\n  {name}: {state}"));
    }
    out
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
