//! Affiliate registry commands.

use std::path::Path;

use anyhow::{bail, Result};
use horus_client::{export_results, import_documents, HorusClient};

#[allow(clippy::too_many_arguments)]
pub async fn query(
    documents: Vec<String>,
    from_excel: Option<&Path>,
    email: &str,
    password: &str,
    export: Option<&Path>,
    delay_min_ms: u64,
    delay_max_ms: u64,
) -> Result<()> {
    let mut documents = documents;
    if let Some(path) = from_excel {
        let outcome = import_documents(path, &documents)?;
        println!(
            "Imported {} document(s), skipped {} duplicate(s).",
            outcome.loaded.len(),
            outcome.skipped
        );
        documents.extend(outcome.loaded);
    }
    if documents.is_empty() {
        bail!("No documents to query. Pass them as arguments or with --from-excel.");
    }

    let mut client = HorusClient::new();
    client.set_delay_ms(delay_min_ms, delay_max_ms);
    client.login(email, password).await?;
    println!("Connected. Querying {} document(s)...", documents.len());

    let rows = client
        .lookup_all(&documents, |done, total, row| {
            let [document, name, status, _] = row.columns();
            println!("[{done}/{total}] {document}  {name}  {status}");
        })
        .await;

    if let Some(path) = export {
        export_results(path, &rows)?;
        println!("Results exported to {}", path.display());
    }

    println!("Finished: {} record(s) processed.", rows.len());
    Ok(())
}
