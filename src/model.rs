use std::time::Instant;

use arboard::Clipboard;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span, Text};
use tracing::{error, info, trace};

use crate::column::{Align, Column, ColumnsSpec, PageContext};
use crate::data_view::{DataView, DataViewOptions};
use crate::dataset::Dataset;
use crate::domain::{DVConfig, DVError, HELP_TEXT, Message};
use crate::record::Row;
use crate::search_bar::SearchEvent;

const CARD_FIELDS: usize = 4;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    SEARCH,
    POPUP,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub body: Vec<String>,
}

pub struct Model {
    config: DVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    name: String,
    view: DataView<Row>,
    popup: Option<Popup>,
    clipboard: Option<Clipboard>,
    status_message: String,
    last_status_message_update: Instant,
    ui_size: (u16, u16),
}

impl Model {
    pub fn init(config: &DVConfig, dataset: Dataset) -> Result<Self, DVError> {
        let config = config.clone().validate()?;
        let headers = dataset.headers.to_vec();
        let search_keys = config.search_keys.clone().unwrap_or_else(|| headers.clone());

        let options = DataViewOptions::default()
            .searchable(config.searchable)
            .search_keys(search_keys)
            .items_per_page(config.items_per_page)
            .title(dataset.name.clone())
            .mobile_breakpoint(config.mobile_breakpoint)
            .max_column_width(config.max_column_width);

        let view = DataView::new(dataset.rows, Self::columns(headers), Self::card)
            .with_options(options);

        let nrows = view.data().len();
        let mut model = Self {
            config,
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            name: dataset.name,
            view,
            popup: None,
            clipboard: None,
            status_message: String::new(),
            last_status_message_update: Instant::now(),
            ui_size: (0, 0),
        };
        model.set_status_message(format!("Loaded {nrows} rows"));
        Ok(model)
    }

    /// A running "No." column followed by one column per header.
    fn columns(headers: Vec<String>) -> ColumnsSpec<Row> {
        ColumnsSpec::dynamic(move |ctx: PageContext| {
            let mut columns = Vec::with_capacity(headers.len() + 1);
            columns.push(
                Column::new("No.", move |_: &Row, idx| Line::from(ctx.ordinal(idx).to_string()))
                    .align(Align::Right),
            );
            for (cidx, header) in headers.iter().enumerate() {
                columns.push(Column::new(header.clone(), move |row: &Row, _| {
                    Line::from(row.display(cidx).to_string())
                }));
            }
            columns
        })
    }

    fn card(row: &Row, _idx: usize) -> Text<'static> {
        let mut pairs = row.pairs();
        let mut lines = Vec::with_capacity(CARD_FIELDS);
        if let Some((_, value)) = pairs.next() {
            lines.push(Line::from(value.to_string().bold()));
        }
        for (header, value) in pairs.take(CARD_FIELDS - 1) {
            lines.push(Line::from(vec![
                Span::from(format!("{header}: ")).dim(),
                Span::from(value.to_string()),
            ]));
        }
        Text::from(lines)
    }

    pub fn view(&self) -> &DataView<Row> {
        &self.view
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SEARCH
    }

    pub fn event_poll_time(&self) -> u64 {
        self.config.event_poll_time
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_status_message_update(&self) -> Instant {
        self.last_status_message_update
    }

    pub fn status_line(&self) -> String {
        let view = &self.view;
        let mut line = format!(
            "{} | {}/{} rows | Page {}/{}",
            self.name,
            view.filtered_len(),
            view.data().len(),
            view.current_page(),
            view.total_pages()
        );
        if !view.search().is_empty() {
            line.push_str(&format!(" | /{}", view.search()));
        }
        line
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), DVError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::NextPage => self.view.next_page(),
                Message::PreviousPage => self.view.previous_page(),
                Message::FirstPage => self.view.first_page(),
                Message::LastPage => self.view.last_page(),
                Message::MoveUp => self.view.select_previous(),
                Message::MoveDown => self.view.select_next(),
                Message::Enter => self.show_record(),
                Message::Exit => self.exit(),
                Message::Help => self.show_help(),
                Message::Search => self.enter_search(),
                Message::CopyRow => self.copy_row(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::RawKey(_) => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Enter | Message::Exit => self.exit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::SEARCH => match msg {
                Message::RawKey(key) => self.search_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn ui_resize(&mut self, width: u16, height: u16) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.ui_size.0, width, self.ui_size.1, height
        );
        self.ui_size = (width, height);
    }

    fn exit(&mut self) {
        match self.modus {
            Modus::TABLE => {
                // Leaving the table means dropping the active filter.
                if !self.view.search().is_empty() {
                    self.view.on_search("");
                    self.set_status_message("Search cleared");
                }
            }
            Modus::POPUP => {
                trace!("Close popup ...");
                self.popup = None;
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::SEARCH => self.leave_search(),
        }
    }

    fn show_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn show_help(&mut self) {
        self.show_popup(Popup {
            title: "Help".to_string(),
            body: HELP_TEXT.lines().map(str::to_string).collect(),
        });
    }

    fn show_record(&mut self) {
        let Some(row) = self.view.selected_record() else {
            return;
        };
        let width = row.headers().iter().map(|h| h.chars().count()).max().unwrap_or(0);
        let body = row
            .pairs()
            .map(|(header, value)| format!("{header:<width$}  {value}"))
            .collect();
        let title = format!(
            "Record {}",
            self.view.page_context().ordinal(self.view.selected().unwrap_or(0))
        );
        self.show_popup(Popup { title, body });
    }

    fn enter_search(&mut self) {
        if !self.view.options().searchable {
            self.set_status_message("Search is disabled");
            return;
        }
        trace!("Entering search mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::SEARCH;
        self.view.focus_search(true);
    }

    fn leave_search(&mut self) {
        self.view.focus_search(false);
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::SEARCH;
        let found = self.view.filtered_len();
        self.set_status_message(format!("Found {found} rows"));
    }

    fn search_input(&mut self, key: KeyEvent) {
        // Esc on an empty query leaves the search bar instead of clearing it.
        if key.code == KeyCode::Esc && self.view.search().is_empty() {
            self.view.on_search("");
            self.leave_search();
            return;
        }
        if let Some(SearchEvent::Submitted) = self.view.handle_search_key(key) {
            self.leave_search();
        }
    }

    fn copy_row(&mut self) {
        let Some(content) = self.view.selected_record().map(Row::to_csv_line) else {
            return;
        };
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {:?}", e);
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(content),
            None => return,
        };
        match result {
            Ok(_) => {
                info!("Copied row to clipboard.");
                self.set_status_message("Copied row to clipboard");
            }
            Err(e) => {
                error!("Error copying to clipboard: {:?}", e);
                self.set_status_message("Copy failed");
            }
        }
    }
}
