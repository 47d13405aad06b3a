use encounter_exporter::{settings::Settings, startup::App};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new().unwrap();
    let app = App::build(settings);

    if let Err(e) = app.run() {
        error!("export run failed: {e:?}");
        std::process::exit(1);
    }
}
