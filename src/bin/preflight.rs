use stray_animal_registry::infra::AppConfig;
use stray_animal_registry::{JsonFileStore, RecordStore, SchemaRegistry};
use std::path::Path;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads the same env vars as the API server:\n\
           BIND_ADDR, DATA_FILE, UPLOAD_DIR, MAX_UPLOAD_BYTES, ANIMAL_SCHEMA, ANIMAL_SCHEMA_FILE\n"
    );
    std::process::exit(2);
}

/// Creates the directory if needed and proves it is writable with a throwaway file.
async fn check_writable_dir(dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot create {}: {}", dir.display(), e))?;
    let probe = dir.join(format!(".preflight-{}", std::process::id()));
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("{} is not writable: {}", dir.display(), e))?;
    tokio::fs::remove_file(&probe).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env()?;
    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DATA_FILE={}", config.data_file.display());
    println!("  UPLOAD_DIR={}", config.upload_dir.display());
    println!("  MAX_UPLOAD_BYTES={}", config.max_upload_bytes);

    // Schema resolves and is consistent
    let schema = SchemaRegistry::with_presets().resolve(&config.schema_name, config.schema_file.as_deref())?;
    println!(
        "  Schema '{}': types={:?} statuses={:?} default_status={:?}",
        schema.name, schema.types, schema.statuses, schema.default_status
    );

    // Record document readable (absent is fine on first run)
    let store = JsonFileStore::new(&config.data_file);
    let records = store.load_all().await?;
    println!("  Record document readable: {} record(s)", records.len());
    let outside: Vec<&str> = records
        .iter()
        .filter(|r| !schema.types.contains(&r.animal_type) || !schema.statuses.contains(&r.status))
        .map(|r| r.id.as_str())
        .collect();
    if !outside.is_empty() {
        eprintln!(
            "  Warning: {} record(s) use a type/status outside schema '{}': {:?}",
            outside.len(),
            schema.name,
            outside
        );
    }

    // Directories writable
    let data_dir = config
        .data_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    check_writable_dir(data_dir).await?;
    println!("  Data directory writable: {}", data_dir.display());
    check_writable_dir(&config.upload_dir).await?;
    println!("  Upload directory writable: {}", config.upload_dir.display());

    println!("> Preflight OK.");
    Ok(())
}
