mod ui;

use std::fs::File;
use std::sync::Mutex;

use ambient::audio_system;
use ambient::backend::RodioBackend;
use ambient::AmbientEngine;
use tokio::sync::watch;

/// the terminal belongs to the UI, so logs only go to the file named by AMBIENT_LOG
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var("AMBIENT_LOG") else { return Ok(()); };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let (handle, channels) = audio_system::channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine = AmbientEngine::new(RodioBackend::new());

    let ui_fut = {
        let shutdown_tx = shutdown_tx.clone();
        async move {
            let res = ui::run_ui(handle, shutdown_tx.clone()).await;
            let _ = shutdown_tx.send(true);
            res
        }
    };

    let engine_fut = async move {
        audio_system::run_engine(engine, channels, shutdown_rx).await;
        Ok::<(), Box<dyn std::error::Error>>(())
    };

    let run_all = async { tokio::try_join!(engine_fut, ui_fut).map(|_| ()) };

    tokio::select! {
        r = run_all => { r?; }
        _ = tokio::signal::ctrl_c() => {
            let _ = shutdown_tx.send(true);
        }
    }

    Ok(())
}
