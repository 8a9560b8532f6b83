mod app;
mod config;
mod effects;
mod input;
mod logging;
mod render;

fn main() -> anyhow::Result<()> {
    app::run()
}
