/*!
 * Command-line interface for fsbrowse
 */

use std::io;
use std::process;
use std::rc::Rc;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use env_logger::Env;
use log::info;

use fsbrowse::config::{Args, Config};
use fsbrowse::display::DisplayFileSystemModel;
use fsbrowse::fs_model::FileSystemModel;
use fsbrowse::model::FileSystemSource;
use fsbrowse::view::{ViewEngine, DEFAULT_VIEW};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "fsbrowse", &mut io::stdout());
        return;
    }

    // Create and validate configuration
    let config = match Config::from_args(args).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    process::exit(run(&config));
}

/// Build the model, load the view and render it; returns the exit status
fn run(config: &Config) -> i32 {
    let mut fs_model = FileSystemModel::new();
    fs_model.set_resolve_symlinks(config.resolve_symlinks);
    fs_model.set_show_hidden(config.show_hidden);
    fs_model.set_name_filters(config.name_filters.clone());
    fs_model.set_root_path(&config.root_path);

    let model = Rc::new(
        DisplayFileSystemModel::new(fs_model).with_date_format(config.date_format.clone()),
    );
    let root_index = model.index_of(&model.root_path());

    info!("root path = {}", model.root_path().display());
    info!(
        "root index row = {} column = {}",
        root_index.row(),
        root_index.column()
    );
    info!(
        "root index parent is valid = {}",
        model.parent(&root_index).is_valid()
    );
    let name_filters = model.source().name_filters();
    info!("name filters: {}", name_filters.len());
    if let Some(first) = name_filters.first() {
        info!("first name filter: {}", first);
    }

    let mut engine = ViewEngine::new();
    engine
        .root_context()
        .set_model("fileSystemModel", model.clone());
    engine.root_context().set_index("rootPathIndex", root_index);

    match &config.view_file {
        Some(path) => engine.load_file(path),
        None => engine.load_str(DEFAULT_VIEW),
    }

    if engine.root_objects().is_empty() {
        return -1;
    }

    for view in engine.root_objects() {
        println!("{}", view.render());
    }

    0
}
