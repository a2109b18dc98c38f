use clap::Parser;
use wasm_bindgen::prelude::*;

mod app;
mod audio;
mod client;
mod coloring;
mod friends;
mod movie;
mod puzzles;
mod story;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a puzzle seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Gemini API key, overriding the one baked in at build time
    #[arg(long)]
    api_key: Option<String>,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("seed: {:?}", args.seed);

    let api_key = args
        .api_key
        .or_else(|| option_env!("GEMINI_API_KEY").map(str::to_string))
        .unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("no Gemini API key configured, generation requests will fail");
    }

    let props = app::AppProps {
        seed: args.seed.unwrap_or_else(utils::js_random_seed),
        studio: client::GeminiClient::new(api_key),
    };

    let root = document()
        .get_element_by_id("app")
        .expect("Could not find id=\"app\" element");

    log::debug!("App started");
    yew::Renderer::<app::App>::with_root_and_props(root, props).render();
}
