use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use docdesk_client::{DocumentApi, DocumentsStore, StoreEvent, UploadFile};
use docdesk_logging::{docs_info, docs_warn};

use crate::cli::{AskArgs, Command, ListArgs, PollArgs, UploadArgs, WatchArgs};
use crate::render;

/// Prints toasts and upload progress while a command runs, counting failures.
pub fn spawn_event_printer(
    events: Receiver<StoreEvent>,
    failures: Arc<AtomicUsize>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut last_progress = None;
        for event in events {
            match event {
                StoreEvent::Changed(view) => {
                    let uploading = view.loading && view.upload_progress > 0;
                    if uploading && last_progress != Some(view.upload_progress) {
                        eprintln!("{}", render::progress(view.upload_progress));
                        last_progress = Some(view.upload_progress);
                    }
                }
                StoreEvent::Notice(notice) => eprintln!("{}", render::notice(&notice)),
                // Already logged at error level by the store.
                StoreEvent::Failed(_) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    })
}

/// Waits for the printer to drain. Returns false if it panicked.
pub fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.join() {
        Ok(()) => true,
        Err(_) => {
            docs_warn!("event printer panicked; failure count may be incomplete");
            false
        }
    }
}

pub async fn run(command: Command, store: &DocumentsStore, api: &dyn DocumentApi) -> Result<()> {
    match command {
        Command::List(args) => list(store, args).await,
        Command::Upload(args) => upload(store, args).await,
        Command::Show { document_id } => show(store, &document_id).await,
        Command::Ask(args) => ask(store, args).await,
        Command::Summary { document_id } => {
            if let Some(summary) = store.generate_summary(&document_id).await {
                println!("{summary}");
            }
            Ok(())
        }
        Command::Delete { document_id } => {
            store.delete_document(&document_id).await;
            Ok(())
        }
        Command::Watch(args) => watch(store, args).await,
        Command::Health => {
            let status = api.health().await.context("health check failed")?;
            println!("{}", render::health(&status));
            if !status.is_healthy() {
                bail!("service reports status {}", status.status);
            }
            Ok(())
        }
    }
}

async fn list(store: &DocumentsStore, args: ListArgs) -> Result<()> {
    store.fetch_documents().await;
    let documents = if args.completed {
        store.completed_documents()
    } else if args.processing {
        store.processing_documents()
    } else {
        store.documents()
    };
    print!("{}", render::document_table(&documents));
    Ok(())
}

async fn upload(store: &DocumentsStore, args: UploadArgs) -> Result<()> {
    let file = UploadFile::from_path(&args.path)
        .with_context(|| format!("cannot read {}", args.path.display()))?;
    let Some(document_id) = store.upload_document(file).await else {
        return Ok(());
    };
    println!("{document_id}");

    if args.wait {
        settle(store, &document_id, args.poll).await;
    }
    Ok(())
}

async fn show(store: &DocumentsStore, document_id: &str) -> Result<()> {
    store.select_document(document_id).await;
    if let Some(document) = store.current_document() {
        println!("{}", render::document_detail(&document));
    }
    Ok(())
}

async fn ask(store: &DocumentsStore, args: AskArgs) -> Result<()> {
    store.select_document(&args.document_id).await;
    if store.current_document().is_none() {
        bail!("document {} could not be selected", args.document_id);
    }
    for question in &args.questions {
        store.query_document(question).await;
    }
    let history = store.query_history();
    if !history.is_empty() {
        println!("{}", render::transcript(&history));
    }
    Ok(())
}

async fn watch(store: &DocumentsStore, args: WatchArgs) -> Result<()> {
    settle(store, &args.document_id, args.poll).await;
    Ok(())
}

async fn settle(store: &DocumentsStore, document_id: &str, poll: PollArgs) {
    docs_info!("waiting for {document_id} to finish processing");
    let interval = Duration::from_secs(poll.interval_secs);
    match store
        .wait_until_settled(document_id, interval, poll.max_polls)
        .await
    {
        Some(document) => println!("{}", render::document_detail(&document)),
        None => eprintln!("{document_id} is still being processed"),
    }
}
