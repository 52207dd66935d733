use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use dv::controller::Controller;
use dv::dataset::Dataset;
use dv::domain::{DVConfig, DVError};
use dv::logging;
use dv::model::{Model, Status};
use dv::ui::TableUI;

/// Browse a table export page by page.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Data file (csv, parquet, arrow/ipc/feather, json)
    path: String,

    /// Rows shown per page
    #[arg(short = 'n', long, default_value_t = dv::data_view::DEFAULT_ITEMS_PER_PAGE)]
    items_per_page: usize,

    /// Columns the search looks at, comma separated. Defaults to all columns.
    #[arg(short = 'k', long, value_delimiter = ',')]
    search_keys: Option<Vec<String>>,

    /// Hide the search bar
    #[arg(long)]
    no_search: bool,

    /// Terminal width below which rows are shown as cards
    #[arg(long, default_value_t = dv::data_view::DEFAULT_MOBILE_BREAKPOINT)]
    mobile_breakpoint: u16,

    /// Maximal width of a column
    #[arg(long, default_value_t = dv::data_view::DEFAULT_MAX_COLUMN_WIDTH)]
    max_column_width: usize,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> DVConfig {
        DVConfig {
            items_per_page: self.items_per_page,
            searchable: !self.no_search,
            search_keys: self.search_keys.clone(),
            mobile_breakpoint: self.mobile_breakpoint,
            max_column_width: self.max_column_width,
            ..DVConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Err(e) => {
            ratatui::restore();
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: Cli) -> Result<(), DVError> {
    logging::init(cli.log_file.as_deref())?;

    let cfg = cli.config().validate()?;
    let path = shellexpand::full(&cli.path)
        .map_err(|e| DVError::LoadingFailed(e.to_string()))?;
    info!("Starting dv for {path}");

    let dataset = Dataset::load(PathBuf::from(path.as_ref()))?;
    let mut model = Model::init(&cfg, dataset)?;
    let mut ui = TableUI::new();
    let controller = Controller::new();

    let mut terminal = ratatui::init();

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(&model, f))?;

        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    Ok(())
}
