//! TUI dashboard for the warranty client.
//!
//! This module provides a terminal UI using ratatui that shows the
//! account's warranties with their coverage status, registers new ones,
//! and drives the premium upgrade payment flow. Network calls run on a
//! worker task so the interface stays responsive while a request is in
//! flight.

use anyhow::Result;
use chrono::{DateTime, Utc};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Position},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, Clear, List, ListDirection, ListItem, Padding, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, Table,
    },
};
use std::time::Duration;
use tokio::sync::mpsc;
use warranty_vault::upgrade::UpgradeForm;
use warranty_vault::{Warranty, WarrantyStatus};

use crate::api_client::{ApiClient, Profile, WarrantyDraft};
use crate::commands::{self, Command};

mod widgets;

use widgets::{ScrollableList, UserInput};

const HELP: &str = "\
add NAME | YYYY-MM-DD | MONTHS [| NOTES [| IMAGE [| RECEIPT]]]
        Register a warranty: item name, purchase date, and coverage in
        months, with optional notes and local image/receipt attachments.
logout
        Clear the stored session and leave the dashboard.
refresh
        Re-fetch the warranty list from the backend.
upgrade FIRST_NAME COUNTRY_CODE PHONE_NUMBER
        Request the premium upgrade payment link. Your account email is
        filled in automatically from your profile.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// How the dashboard session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Keep the stored session for the next launch.
    Keep,
    /// The user logged out; the stored token must be cleared.
    Logout,
}

/// Requests dispatched to the API worker task.
#[derive(Debug)]
enum ApiRequest {
    FetchWarranties,
    FetchProfile,
    AddWarranty(WarrantyDraft),
    CreateCharge(UpgradeForm),
}

/// Results surfaced back to the UI loop.
#[derive(Debug)]
enum ApiEvent {
    Warranties(Vec<Warranty>),
    Profile(Profile),
    WarrantyAdded,
    ChargeCreated(String),
    Failed(String),
}

/// Process API requests one at a time, reporting each outcome to the UI.
///
/// Requests are independent; a failure is scoped to the one action that
/// produced it and never retried.
async fn run_api_worker(
    client: ApiClient,
    mut rx_request: mpsc::UnboundedReceiver<ApiRequest>,
    tx_event: mpsc::UnboundedSender<ApiEvent>,
) {
    while let Some(request) = rx_request.recv().await {
        let event = match request {
            ApiRequest::FetchWarranties => match client.list_warranties().await {
                Ok(warranties) => ApiEvent::Warranties(warranties),
                Err(e) => ApiEvent::Failed(format!("Error fetching warranties: {e:#}")),
            },
            ApiRequest::FetchProfile => match client.me().await {
                Ok(profile) => ApiEvent::Profile(profile),
                Err(e) => ApiEvent::Failed(format!("Error fetching profile: {e:#}")),
            },
            ApiRequest::AddWarranty(draft) => match client.create_warranty(draft).await {
                Ok(()) => ApiEvent::WarrantyAdded,
                Err(e) => ApiEvent::Failed(format!("Error adding warranty: {e:#}")),
            },
            ApiRequest::CreateCharge(form) => match client.create_charge(&form).await {
                Ok(url) => ApiEvent::ChargeCreated(url),
                Err(e) => ApiEvent::Failed(format!("Payment error: {e:#}")),
            },
        };

        if tx_event.send(event).is_err() {
            break;
        }
    }
}

#[derive(Clone)]
enum RecordKind {
    Ack,
    Alert,
    Error,
    Info,
    You,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Ack => "ACK".light_blue(),
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Info => "INFO".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        let content = Line::from(msg);
        ListItem::new(content)
    }
}

fn make_status_span(status: WarrantyStatus) -> Span<'static> {
    let repr = status.to_string();
    match status {
        WarrantyStatus::Active => Span::styled(repr, Style::default().light_green()),
        WarrantyStatus::ExpiringSoon => Span::styled(repr, Style::default().light_yellow()),
        WarrantyStatus::Expired => Span::styled(repr, Style::default().light_red()),
    }
}

fn make_warranty_row(warranty: &Warranty, now: DateTime<Utc>) -> Row<'static> {
    let status = warranty.status(now);

    // The days column only means something while coverage is open.
    let days_repr = match status {
        WarrantyStatus::Expired => String::new(),
        _ => warranty.days_until_expiry(now).to_string(),
    };

    Row::new(vec![
        Cell::new(Text::from(warranty.item_name.clone()).alignment(Alignment::Left)),
        Cell::new(Text::from(warranty.purchase_date.to_string()).alignment(Alignment::Left)),
        Cell::new(Text::from(warranty.expiry_date().to_string()).alignment(Alignment::Left)),
        Cell::new(Text::from(warranty.duration.to_string()).alignment(Alignment::Right)),
        Cell::new(Text::from(days_repr).alignment(Alignment::Right)),
        Cell::new(Text::from(make_status_span(status)).alignment(Alignment::Center)),
    ])
}

/// TUI App state
pub struct TuiApp {
    /// Backend host shown in the input box title
    server_name: String,
    /// Account email, known once the profile fetch lands
    account: Option<String>,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
    /// Warranties in backend order
    warranties: Vec<Warranty>,
    /// Number of requests currently in flight
    pending: usize,
}

impl TuiApp {
    pub fn new(server_name: String) -> Self {
        // Fill help menu with help text lines
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        Self {
            server_name,
            account: None,
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
            warranties: Vec::new(),
            pending: 0,
        }
    }

    /// Add log message
    fn add_log(&mut self, kind: RecordKind, content: String) {
        let record = Record::new(kind, content);
        self.log_handle.push(record.into());
    }

    /// Parse user input and dispatch the resulting command.
    ///
    /// Returns how the session should end when the command terminates it.
    fn handle_command(
        &mut self,
        user_input: &str,
        tx: &mpsc::UnboundedSender<ApiRequest>,
    ) -> Result<Option<SessionEnd>> {
        if user_input.trim().is_empty() {
            return Ok(None);
        }

        match commands::parse_command(user_input) {
            Ok(command) => {
                self.add_log(RecordKind::You, user_input.to_string());
                match command {
                    Command::Refresh => {
                        tx.send(ApiRequest::FetchWarranties)?;
                        self.pending += 1;
                    }
                    Command::Add(draft) => {
                        tx.send(ApiRequest::AddWarranty(draft))?;
                        self.pending += 1;
                    }
                    Command::Upgrade {
                        first_name,
                        country_code,
                        phone_number,
                    } => {
                        self.start_upgrade(tx, &first_name, &country_code, &phone_number)?;
                    }
                    Command::Logout => return Ok(Some(SessionEnd::Logout)),
                }
            }
            Err(e) => {
                self.add_log(RecordKind::Error, e.to_string());
            }
        }

        Ok(None)
    }

    /// Build, normalize, and validate the upgrade form, then request the
    /// payment charge. Validation failures never reach the network; every
    /// failed field is reported and the user can correct and resubmit.
    fn start_upgrade(
        &mut self,
        tx: &mpsc::UnboundedSender<ApiRequest>,
        first_name: &str,
        country_code: &str,
        phone_number: &str,
    ) -> Result<()> {
        let Some(email) = self.account.clone() else {
            self.add_log(
                RecordKind::Error,
                "Your profile has not loaded yet; try again in a moment".to_string(),
            );
            return Ok(());
        };

        let mut form = UpgradeForm::default();
        form.set_first_name(first_name);
        form.set_email(&email);
        form.set_country_code(country_code);
        form.set_phone_number(phone_number);

        match form.validate() {
            Ok(()) => {
                tx.send(ApiRequest::CreateCharge(form))?;
                self.pending += 1;
            }
            Err(errors) => {
                for (field, error) in errors.iter() {
                    self.add_log(RecordKind::Error, format!("{}: {}", field, error));
                }
            }
        }

        Ok(())
    }

    /// Apply a worker result to the dashboard state.
    fn handle_event(
        &mut self,
        event: ApiEvent,
        tx: &mpsc::UnboundedSender<ApiRequest>,
    ) -> Result<()> {
        match event {
            ApiEvent::Warranties(warranties) => {
                self.add_log(
                    RecordKind::Ack,
                    format!("Loaded {} warranties", warranties.len()),
                );
                self.warranties = warranties;
            }
            ApiEvent::Profile(profile) => {
                self.add_log(RecordKind::Info, format!("Signed in as {}", profile.email));
                self.account = Some(profile.email);
            }
            ApiEvent::WarrantyAdded => {
                self.add_log(RecordKind::Ack, "Warranty added".to_string());
                // The dashboard refetches after every successful creation.
                tx.send(ApiRequest::FetchWarranties)?;
                self.pending += 1;
            }
            ApiEvent::ChargeCreated(payment_url) => {
                self.add_log(
                    RecordKind::Alert,
                    "Redirecting to the payment provider...".to_string(),
                );
                self.add_log(RecordKind::Info, payment_url.clone());
                if let Err(e) = open::that(&payment_url) {
                    self.add_log(RecordKind::Error, format!("Failed to open browser: {}", e));
                }
            }
            ApiEvent::Failed(message) => self.add_log(RecordKind::Error, message),
        }

        Ok(())
    }

    /// Render the warranty table with per-status counts
    fn draw_warranties(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let now = Utc::now();

        let (mut active, mut expiring, mut expired) = (0usize, 0usize, 0usize);
        for warranty in &self.warranties {
            match warranty.status(now) {
                WarrantyStatus::Active => active += 1,
                WarrantyStatus::ExpiringSoon => expiring += 1,
                WarrantyStatus::Expired => expired += 1,
            }
        }

        let block = Block::bordered()
            .padding(Padding::uniform(1))
            .title_top(" warranties  ")
            .title_bottom(format!(
                " active: {}  expiring soon: {}  expired: {}  ",
                active, expiring, expired
            ));

        if self.warranties.is_empty() {
            let message = if self.pending > 0 {
                "Loading warranties..."
            } else {
                "No warranties yet. Use 'add' to register your first one."
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let table = Table::new(
            self.warranties
                .iter()
                .map(|warranty| make_warranty_row(warranty, now)),
            [
                Constraint::Fill(3),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Max(8),
                Constraint::Max(11),
                Constraint::Length(15),
            ],
        )
        .header(
            Row::new(vec![
                "item",
                "purchased",
                "expires",
                "months",
                "days left",
                "status",
            ])
            .bold(),
        )
        .block(block);
        frame.render_widget(table, area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        // Render log window scrollbar
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area
    fn draw_user_input(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let account = self.account.as_deref().unwrap_or("guest");
        let user_input = Paragraph::new(self.user_input.value.as_str())
            .style(Style::default())
            .block(
                Block::bordered()
                    .title(format!(" {}@{}  ", account, self.server_name).light_green()),
            );
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let status_indicator = if self.pending > 0 {
            "● Working...".light_yellow()
        } else {
            "● Ready".green()
        };

        let help_message = vec![
            status_indicator,
            " | press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to record a command, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        let help_message = Paragraph::new(Line::from(help_message));
        frame.render_widget(help_message, area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(16)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(92)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        // Render help text
        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(Block::bordered().title(" commands  "));
        frame.render_stateful_widget(
            help_items,
            help_menu_area,
            &mut self.help_handle.list_state,
        );

        // Render help scrollbar
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    /// Main draw function - orchestrates rendering of all UI components
    fn draw(&mut self, frame: &mut Frame) {
        // Define the main layout structure
        let window = Layout::vertical([
            Constraint::Min(6),    // Top area (warranties + log)
            Constraint::Length(3), // User input area
            Constraint::Length(1), // Help bar
        ]);
        let [top_area, user_input_area, help_area] = window.areas(frame.area());

        // Split top area into warranty table and log
        let [warranty_area, log_area] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(top_area);

        // Render all components
        self.draw_warranties(frame, warranty_area);
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        // Render help menu overlay if active
        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application
    pub async fn run(
        mut self,
        api_client: ApiClient,
        mut terminal: DefaultTerminal,
    ) -> Result<SessionEnd> {
        // Channels between the UI loop and the API worker
        let (tx_request, rx_request) = mpsc::unbounded_channel::<ApiRequest>();
        let (tx_event, mut rx_event) = mpsc::unbounded_channel::<ApiEvent>();

        let worker_handle = tokio::spawn(run_api_worker(api_client, rx_request, tx_event));

        // Initial dashboard load: the warranty list plus the profile email
        // that prefills the upgrade form
        tx_request.send(ApiRequest::FetchWarranties)?;
        tx_request.send(ApiRequest::FetchProfile)?;
        self.pending += 2;

        // Main UI loop
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            // Check for keyboard input
            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match modifiers {
                    KeyModifiers::CONTROL => match code {
                        KeyCode::Home => self.log_handle.jump_to_first(),
                        KeyCode::End => self.log_handle.jump_to_last(),
                        _ => {}
                    },
                    KeyModifiers::NONE | KeyModifiers::SHIFT => match code {
                        KeyCode::Enter => {
                            let user_input = self.user_input.submit();
                            if let Some(end) = self.handle_command(&user_input, &tx_request)? {
                                worker_handle.abort();
                                return Ok(end);
                            }
                        }
                        KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                        KeyCode::Backspace => self.user_input.backspace(),
                        KeyCode::Delete => self.user_input.delete(),
                        KeyCode::Left => self.user_input.move_left(),
                        KeyCode::Right => self.user_input.move_right(),
                        KeyCode::Up => {
                            if self.show_help_menu {
                                self.help_handle.move_up();
                            } else {
                                self.log_handle.move_up();
                            }
                        }
                        KeyCode::Down => {
                            if self.show_help_menu {
                                self.help_handle.move_down();
                            } else {
                                self.log_handle.move_down();
                            }
                        }
                        KeyCode::Home => self.user_input.jump_to_first(),
                        KeyCode::End => self.user_input.jump_to_last(),
                        KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                        KeyCode::Esc => {
                            worker_handle.abort();
                            return Ok(SessionEnd::Keep);
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }

            // Apply any finished API calls
            while let Ok(api_event) = rx_event.try_recv() {
                self.pending = self.pending.saturating_sub(1);
                self.handle_event(api_event, &tx_request)?;
            }
        }
    }
}
