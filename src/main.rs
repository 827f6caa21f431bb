use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod session;

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Story, StoryDraft};
use crate::session::{Command, Outcome, Session};

const STORAGE_TOKEN_KEY: &str = "auth_token";
const STORAGE_USERNAME_KEY: &str = "auth_username";

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hack_or_snooze_reader=info")),
        )
        .init();

    let config = Config::from_env();

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([720.0, 540.0])
            .with_title("Hack or Snooze"),
        ..Default::default()
    };

    eframe::run_native(
        "Hack or Snooze",
        options,
        Box::new(move |cc| {
            let mut app = HackOrSnoozeApp::new(&config);

            if let Some(storage) = cc.storage {
                // Restore the saved theme preference
                if let Some(theme_str) = storage.get_string("is_dark_mode") {
                    if let Ok(is_dark_mode) = theme_str.parse::<bool>() {
                        app.is_dark_mode = is_dark_mode;
                        app.theme = if is_dark_mode {
                            AppTheme::dark()
                        } else {
                            AppTheme::light()
                        };
                    }
                }

                // Restore the saved login. The token still has to be accepted
                // by the service, which happens on the first frame.
                let token = storage.get_string(STORAGE_TOKEN_KEY).unwrap_or_default();
                let username = storage.get_string(STORAGE_USERNAME_KEY).unwrap_or_default();
                if !token.is_empty() && !username.is_empty() {
                    app.stored_credentials = Some((token, username));
                }
            }

            Ok(Box::new(app))
        }),
    )
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    accent: Color32,
    separator: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0),
            accent: Color32::from_rgb(255, 153, 51),
            separator: Color32::from_rgb(60, 60, 60),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            accent: Color32::from_rgb(220, 110, 20),
            separator: Color32::from_rgb(200, 200, 200),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        // Set base colors
        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;

        // Set text colors
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);

        // Set button styles
        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        // Set selection color
        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        // Set various rounding amounts
        style.visuals.window_corner_radius = CornerRadius::same(8);
        style.visuals.menu_corner_radius = CornerRadius::same(6);
        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        // Light backgrounds need stronger shadows for depth
        let is_light_theme =
            self.background.r() > 128 && self.background.g() > 128 && self.background.b() > 128;

        if is_light_theme {
            style.visuals.popup_shadow = egui::epaint::Shadow {
                offset: [2, 2],
                blur: 8,
                spread: 1,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 30),
            };
            style.visuals.window_shadow = egui::epaint::Shadow {
                offset: [3, 3],
                blur: 12,
                spread: 2,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 20),
            };
        } else {
            style.visuals.popup_shadow = egui::epaint::Shadow {
                offset: [1, 1],
                blur: 6,
                spread: 0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 50),
            };
            style.visuals.window_shadow = egui::epaint::Shadow {
                offset: [2, 2],
                blur: 10,
                spread: 1,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 40),
            };
        }

        // Apply the style
        ctx.set_style(style);
    }
}

// The three story collections the list area can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    All,
    Favorites,
    MyStories,
}

struct HackOrSnoozeApp {
    api: ApiClient,
    session: Session,
    current_view: View,
    theme: AppTheme,
    is_dark_mode: bool,
    // True while a worker thread is running; at most one request in flight
    busy: bool,
    worker: Option<thread::JoinHandle<()>>,
    outcome_receiver: Option<std::sync::mpsc::Receiver<Outcome>>,
    needs_repaint: bool,
    // Pending actions to avoid borrow checker issues
    pending_favorite_toggle: Option<String>, // Story ID to toggle
    pending_delete: Option<String>,          // Story ID to delete
    // Submit form
    show_submit_form: bool,
    draft_author: String,
    draft_title: String,
    draft_url: String,
    // Login / signup forms
    show_auth_forms: bool,
    signup_mode: bool,
    auth_username: String,
    auth_password: String,
    auth_name: String,
    // Blocking notification text, if any
    alert: Option<String>,
    // Login saved by a previous run, consumed on the first frame
    stored_credentials: Option<(String, String)>,
    started: bool,
}

impl HackOrSnoozeApp {
    fn new(config: &Config) -> Self {
        Self {
            api: ApiClient::new(config),
            session: Session::default(),
            current_view: View::All,
            theme: AppTheme::dark(),
            is_dark_mode: true,
            busy: false,
            worker: None,
            outcome_receiver: None,
            needs_repaint: false,
            pending_favorite_toggle: None,
            pending_delete: None,
            show_submit_form: false,
            draft_author: String::new(),
            draft_title: String::new(),
            draft_url: String::new(),
            show_auth_forms: false,
            signup_mode: false,
            auth_username: String::new(),
            auth_password: String::new(),
            auth_name: String::new(),
            alert: None,
            stored_credentials: None,
            started: false,
        }
    }

    /// Hand a command to a worker thread. Ignored while another request is
    /// in flight, so buttons are inert while the spinner shows.
    fn dispatch(&mut self, command: Command) {
        if self.busy {
            return;
        }

        tracing::debug!(command = command.name(), "dispatching");
        self.busy = true;

        let api = self.api.clone();
        let auth = self.session.credentials();
        let (tx, rx) = std::sync::mpsc::channel();

        let handle = thread::spawn(move || {
            let outcome = command.run(&api, auth.as_ref());
            let _ = tx.send(outcome);
        });

        self.worker = Some(handle);

        // Store the receiver for later checks
        self.outcome_receiver = Some(rx);
    }

    fn check_worker(&mut self) {
        if let Some(rx) = &self.outcome_receiver {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.outcome_receiver = None; // Consume the receiver
                    self.busy = false;
                    self.handle_outcome(outcome);
                    self.needs_repaint = true;
                }
                Err(_) => {
                    // Still waiting for the worker
                }
            }
        }

        // Check if the thread is finished
        if let Some(handle) = &self.worker {
            if handle.is_finished() {
                let thread = std::mem::take(&mut self.worker);

                // Join for cleanliness; the result travels over the channel
                if let Some(thread) = thread {
                    let _ = thread.join();
                }
            }
        }
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        let restored = matches!(outcome, Outcome::SessionRestored(_));
        let posted = matches!(outcome, Outcome::StoryPosted(_));
        let logged_in = matches!(outcome, Outcome::LoggedIn(_));

        match self.session.apply(outcome) {
            Ok(()) => {
                if posted {
                    // The new story is already at the top of the list, so the
                    // form has done its job
                    self.draft_author.clear();
                    self.draft_title.clear();
                    self.draft_url.clear();
                    self.show_submit_form = false;
                    self.current_view = View::All;
                }
                if logged_in {
                    self.show_auth_forms = false;
                    self.auth_password.clear();
                    self.auth_name.clear();
                }
                if restored {
                    // Load stories after the restore settles so the stars are
                    // right on the first paint
                    self.dispatch(Command::LoadStories);
                }
            }
            Err(err) => {
                if let Some(message) = err.user_message() {
                    self.alert = Some(message.to_string());
                } else {
                    tracing::error!(error = %err, "request failed");
                }
            }
        }
    }

    fn open_link(&self, url: &str) {
        if let Err(err) = open::that(url) {
            tracing::warn!(url, error = %err, "failed to open URL");
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
        self.needs_repaint = true;
    }

    fn switch_view(&mut self, view: View) {
        if self.current_view != view {
            self.current_view = view;
            self.needs_repaint = true;
        }
        self.show_submit_form = false;
        self.show_auth_forms = false;
    }

    fn logout(&mut self) {
        self.session.logout();
        self.current_view = View::All;
        self.show_submit_form = false;
        self.signup_mode = false;
    }
}

impl eframe::App for HackOrSnoozeApp {
    // Save the app state when the app is closing
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        // Save theme preference
        storage.set_string("is_dark_mode", self.is_dark_mode.to_string());

        // Save the login so the next run can pick the session back up.
        // Blank values mean logged out.
        match self.session.credentials() {
            Some(auth) => {
                storage.set_string(STORAGE_TOKEN_KEY, auth.token);
                storage.set_string(STORAGE_USERNAME_KEY, auth.username);
            }
            None => {
                storage.set_string(STORAGE_TOKEN_KEY, String::new());
                storage.set_string(STORAGE_USERNAME_KEY, String::new());
            }
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply our custom theme
        self.theme.apply_to_ctx(ctx);

        // Check if a running request has finished
        self.check_worker();

        // Kick off the startup work on the first frame
        if !self.started {
            self.started = true;
            match self.stored_credentials.take() {
                Some((token, username)) => {
                    self.dispatch(Command::RestoreSession { token, username });
                }
                None => self.dispatch(Command::LoadStories),
            }
        }

        // Process any pending actions
        if let Some(story_id) = self.pending_favorite_toggle.take() {
            if let Some(user) = &self.session.user {
                let command = if user.is_favorite(&story_id) {
                    Command::RemoveFavorite(story_id)
                } else {
                    Command::AddFavorite(story_id)
                };
                self.dispatch(command);
            }
        }

        if let Some(story_id) = self.pending_delete.take() {
            self.dispatch(Command::DeleteStory(story_id));
        }

        // Keep polling while a worker runs, even with no input events
        if self.busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // Request repaint if needed
        if self.needs_repaint {
            ctx.request_repaint();
            self.needs_repaint = false;
        }

        // Set up main layout
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui);

            ui.add_space(8.0);
            ui.add(egui::Separator::default().spacing(8.0));

            if self.show_auth_forms {
                self.render_auth_forms(ui);
                return;
            }

            if self.show_submit_form {
                self.render_submit_form(ui);
                ui.add_space(4.0);
            }

            self.render_story_list(ui);
        });

        self.render_alert(ctx);
    }
}

impl HackOrSnoozeApp {
    fn render_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("Hack or Snooze")
                    .color(self.theme.highlight)
                    .size(24.0),
            );

            ui.add_space(20.0);

            // Navigation bar for the story views
            ui.horizontal(|ui| {
                self.render_nav_buttons(ui);
            });

            // Push buttons to the right
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // Theme toggle button
                let theme_icon = if self.is_dark_mode { "☀" } else { "☾" };
                let theme_btn = ui.add(
                    egui::Button::new(
                        RichText::new(theme_icon)
                            .color(self.theme.button_foreground)
                            .size(22.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(16)) // Make it circular
                    .fill(self.theme.button_background),
                );

                if theme_btn.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }

                if theme_btn.clicked() {
                    self.toggle_theme();
                    // Request immediate repaint to avoid a frame with the old theme
                    ui.ctx().request_repaint();
                }

                ui.add_space(12.0);

                // Refresh button
                let refresh_btn = ui.add(
                    egui::Button::new(
                        RichText::new("↻")
                            .color(self.theme.button_foreground)
                            .size(22.0),
                    )
                    .min_size(egui::Vec2::new(32.0, 32.0))
                    .corner_radius(CornerRadius::same(16)) // Make it circular
                    .fill(self.theme.button_background),
                );

                if refresh_btn.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }

                if refresh_btn.clicked() && !self.busy {
                    self.dispatch(Command::LoadStories);
                }

                ui.add_space(12.0);

                if self.busy {
                    ui.spinner();
                    ui.add_space(8.0);
                }

                // Account controls
                let username = self
                    .session
                    .user
                    .as_ref()
                    .map(|user| user.username.clone());
                if let Some(username) = username {
                    let logout_btn = ui.add_sized(
                        [80.0, 32.0],
                        egui::Button::new(
                            RichText::new("Logout")
                                .size(14.0)
                                .color(self.theme.button_foreground),
                        )
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                    );

                    if logout_btn.clicked() {
                        self.logout();
                    }

                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(username)
                            .color(self.theme.accent)
                            .size(15.0)
                            .strong(),
                    );
                } else {
                    let login_btn = ui.add_sized(
                        [120.0, 32.0],
                        egui::Button::new(if self.show_auth_forms {
                            RichText::new("Login / Signup")
                                .size(14.0)
                                .color(self.theme.highlight)
                                .strong()
                        } else {
                            RichText::new("Login / Signup")
                                .size(14.0)
                                .color(self.theme.button_foreground)
                        })
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                    );

                    if login_btn.clicked() {
                        self.show_auth_forms = !self.show_auth_forms;
                        self.show_submit_form = false;
                    }
                }
            });
        });
    }

    fn render_nav_buttons(&mut self, ui: &mut Ui) {
        let all_btn = self.view_button(ui, "All", self.current_view == View::All);
        if all_btn.clicked() {
            self.switch_view(View::All);
        }

        // Submit, favorites and own stories only exist for a logged-in user
        if self.session.is_logged_in() {
            let submit_btn = self.view_button(ui, "Submit", self.show_submit_form);
            if submit_btn.clicked() {
                // The form sits above the full story list
                self.show_submit_form = !self.show_submit_form;
                self.show_auth_forms = false;
                self.current_view = View::All;
            }

            let favorites_btn =
                self.view_button(ui, "Favorites", self.current_view == View::Favorites);
            if favorites_btn.clicked() {
                self.switch_view(View::Favorites);
            }

            let my_stories_btn =
                self.view_button(ui, "My Stories", self.current_view == View::MyStories);
            if my_stories_btn.clicked() {
                self.switch_view(View::MyStories);
            }
        }
    }

    fn view_button(&self, ui: &mut Ui, label: &str, active: bool) -> egui::Response {
        ui.add_sized(
            [96.0, 32.0],
            egui::Button::new(
                // Different RichText objects depending on the active state
                if active {
                    RichText::new(label)
                        .size(16.0)
                        .color(self.theme.highlight)
                        .strong()
                } else {
                    RichText::new(label)
                        .size(16.0)
                        .color(self.theme.secondary_text)
                },
            )
            .fill(if active {
                self.theme.card_background
            } else {
                Color32::TRANSPARENT
            })
            .stroke(if active {
                egui::Stroke::new(2.0, self.theme.highlight)
            } else {
                egui::Stroke::NONE
            }),
        )
    }

    fn render_submit_form(&mut self, ui: &mut Ui) {
        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(8))
            .stroke(Stroke::new(1.0, self.theme.separator))
            .inner_margin(12.0)
            .outer_margin(egui::vec2(8.0, 6.0))
            .show(ui, |ui| {
                ui.heading(
                    RichText::new("Submit a Story")
                        .size(18.0)
                        .color(self.theme.text),
                );
                ui.add_space(8.0);

                egui::Grid::new("submit_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("author").color(self.theme.secondary_text));
                        ui.add(
                            egui::TextEdit::singleline(&mut self.draft_author)
                                .desired_width(340.0)
                                .hint_text("author name"),
                        );
                        ui.end_row();

                        ui.label(RichText::new("title").color(self.theme.secondary_text));
                        ui.add(
                            egui::TextEdit::singleline(&mut self.draft_title)
                                .desired_width(340.0)
                                .hint_text("story title"),
                        );
                        ui.end_row();

                        ui.label(RichText::new("url").color(self.theme.secondary_text));
                        ui.add(
                            egui::TextEdit::singleline(&mut self.draft_url)
                                .desired_width(340.0)
                                .hint_text("story url"),
                        );
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let submit_btn = ui.add_enabled(
                        !self.busy,
                        egui::Button::new(
                            RichText::new("submit")
                                .size(14.0)
                                .color(self.theme.button_foreground),
                        )
                        .min_size(egui::Vec2::new(80.0, 30.0))
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_active_background),
                    );

                    // The fields go out exactly as typed; the service decides
                    // what it will accept.
                    if submit_btn.clicked() {
                        let draft = StoryDraft {
                            author: self.draft_author.clone(),
                            title: self.draft_title.clone(),
                            url: self.draft_url.clone(),
                        };
                        self.dispatch(Command::SubmitStory(draft));
                    }

                    ui.add_space(4.0);

                    let cancel_btn = ui.add(
                        egui::Button::new(
                            RichText::new("cancel")
                                .size(14.0)
                                .color(self.theme.button_foreground),
                        )
                        .min_size(egui::Vec2::new(80.0, 30.0))
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                    );

                    if cancel_btn.clicked() {
                        self.show_submit_form = false;
                    }
                });
            });
    }

    fn render_auth_forms(&mut self, ui: &mut Ui) {
        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(8))
            .stroke(Stroke::new(1.0, self.theme.separator))
            .inner_margin(12.0)
            .outer_margin(egui::vec2(8.0, 6.0))
            .show(ui, |ui| {
                ui.heading(
                    RichText::new(if self.signup_mode {
                        "Create Account"
                    } else {
                        "Login"
                    })
                    .size(18.0)
                    .color(self.theme.text),
                );
                ui.add_space(8.0);

                egui::Grid::new("auth_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        if self.signup_mode {
                            ui.label(RichText::new("name").color(self.theme.secondary_text));
                            ui.add(
                                egui::TextEdit::singleline(&mut self.auth_name)
                                    .desired_width(260.0)
                                    .hint_text("your name"),
                            );
                            ui.end_row();
                        }

                        ui.label(RichText::new("username").color(self.theme.secondary_text));
                        ui.add(
                            egui::TextEdit::singleline(&mut self.auth_username)
                                .desired_width(260.0)
                                .hint_text("username"),
                        );
                        ui.end_row();

                        ui.label(RichText::new("password").color(self.theme.secondary_text));
                        ui.add(
                            egui::TextEdit::singleline(&mut self.auth_password)
                                .desired_width(260.0)
                                .password(true)
                                .hint_text("password"),
                        );
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let label = if self.signup_mode {
                        "create account"
                    } else {
                        "login"
                    };

                    let submit_btn = ui.add_enabled(
                        !self.busy,
                        egui::Button::new(
                            RichText::new(label)
                                .size(14.0)
                                .color(self.theme.button_foreground),
                        )
                        .min_size(egui::Vec2::new(120.0, 30.0))
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_active_background),
                    );

                    if submit_btn.clicked() {
                        let command = if self.signup_mode {
                            Command::Signup {
                                username: self.auth_username.clone(),
                                password: self.auth_password.clone(),
                                name: self.auth_name.clone(),
                            }
                        } else {
                            Command::Login {
                                username: self.auth_username.clone(),
                                password: self.auth_password.clone(),
                            }
                        };
                        self.dispatch(command);
                    }
                });

                ui.add_space(8.0);

                // Switch between the two forms
                let toggle_text = if self.signup_mode {
                    "Have an account? Login instead"
                } else {
                    "New here? Create an account"
                };
                let toggle_label = ui.add(
                    egui::Label::new(RichText::new(toggle_text).color(self.theme.accent))
                        .sense(egui::Sense::click()),
                );

                if toggle_label.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }

                if toggle_label.clicked() {
                    self.signup_mode = !self.signup_mode;
                }
            });
    }

    fn render_story_list(&mut self, ui: &mut Ui) {
        // Show the current view name
        let view_name = match self.current_view {
            View::All => "All Stories",
            View::Favorites => "Favorites",
            View::MyStories => "My Stories",
        };

        ui.horizontal(|ui| {
            ui.heading(RichText::new(view_name).size(18.0).color(self.theme.text));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.current_view == View::All && !self.session.story_list.is_empty() {
                    ui.label(
                        RichText::new(format!("{} stories loaded", self.session.story_list.len()))
                            .size(13.0)
                            .color(self.theme.secondary_text)
                            .italics(),
                    );
                }
            });
        });

        ui.add_space(4.0);

        // Clone the list for this frame so row clicks can borrow self freely
        let stories: Vec<Story> = match self.current_view {
            View::All => self.session.story_list.iter().cloned().collect(),
            View::Favorites => self
                .session
                .user
                .as_ref()
                .map(|user| user.favorites.clone())
                .unwrap_or_default(),
            View::MyStories => self
                .session
                .user
                .as_ref()
                .map(|user| user.own_stories.clone())
                .unwrap_or_default(),
        };

        if stories.is_empty() {
            self.render_empty_state(ui);
            return;
        }

        let show_stars = self.session.is_logged_in();
        let show_trash = self.current_view == View::MyStories;

        ScrollArea::vertical()
            .id_salt("story_scroll_area")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for story in &stories {
                    self.render_story_row(ui, story, show_stars, show_trash);
                }

                // Allow extra space for scrolling at the bottom
                ui.add_space(20.0);
            });
    }

    fn render_empty_state(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            if self.busy {
                ui.spinner();
                ui.add_space(20.0);
                ui.label(
                    RichText::new("Loading stories...")
                        .color(self.theme.secondary_text)
                        .size(18.0),
                );
                return;
            }

            match self.current_view {
                View::All => {
                    ui.label(
                        RichText::new("No stories loaded yet. Hit the refresh button to try again.")
                            .color(self.theme.secondary_text)
                            .size(18.0),
                    );
                }
                View::Favorites => {
                    ui.label(
                        RichText::new("Stories you favorite will appear here")
                            .color(self.theme.secondary_text)
                            .size(18.0)
                            .italics(),
                    );
                }
                View::MyStories => {
                    ui.label(
                        RichText::new("Stories You submit will appear here.")
                            .color(self.theme.secondary_text)
                            .size(18.0),
                    );
                }
            }
        });
    }

    fn render_story_row(&mut self, ui: &mut Ui, story: &Story, show_stars: bool, show_trash: bool) {
        let ctx = ui.ctx().clone(); // Get context from UI

        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(8))
            .stroke(Stroke::new(1.0, self.theme.separator))
            .inner_margin(12.0)
            .outer_margin(egui::vec2(8.0, 6.0))
            .show(ui, |ui| {
                // Top row with star, title, and host
                ui.horizontal(|ui| {
                    if show_stars {
                        let is_favorite = self
                            .session
                            .user
                            .as_ref()
                            .map(|user| user.is_favorite(&story.story_id))
                            .unwrap_or(false);
                        let star_color = if is_favorite {
                            Color32::from_rgb(255, 204, 0) // Gold star for favorited
                        } else {
                            self.theme.secondary_text
                        };

                        let star_btn = ui.add_sized(
                            [32.0, 28.0],
                            egui::Button::new(RichText::new("★").size(18.0).color(star_color))
                                .corner_radius(CornerRadius::same(6))
                                .fill(self.theme.button_background),
                        );

                        // Add tooltip for the star button
                        if star_btn.hovered() {
                            ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);

                            let tooltip_pos = star_btn.rect.left_top() + egui::vec2(0.0, -30.0);

                            // Use the story ID to make the tooltip unique per story
                            egui::Area::new(
                                egui::Id::new("star_tooltip_area").with(story.story_id.clone()),
                            )
                            .order(egui::Order::Tooltip)
                            .fixed_pos(tooltip_pos)
                            .show(&ctx, |ui| {
                                egui::Frame::popup(ui.style())
                                    .fill(self.theme.card_background)
                                    .stroke(Stroke::new(1.0, self.theme.separator))
                                    .corner_radius(CornerRadius::same(6))
                                    .show(ui, |ui| {
                                        ui.add(egui::Label::new(if is_favorite {
                                            "Remove from Favorites"
                                        } else {
                                            "Add to Favorites"
                                        }));
                                    });
                            });
                        }

                        if star_btn.clicked() {
                            self.pending_favorite_toggle = Some(story.story_id.clone());
                        }

                        ui.add_space(4.0);
                    }

                    // Story title with clickable behavior
                    let title_label = ui.add(
                        egui::Label::new(
                            RichText::new(&story.title)
                                .color(self.theme.text)
                                .size(16.0)
                                .strong(),
                        )
                        .sense(egui::Sense::click()),
                    );

                    if title_label.clicked() && !story.url.is_empty() {
                        self.open_link(&story.url);
                    }

                    if title_label.hovered() {
                        ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                    }

                    // Add the host if the URL has one
                    if let Some(host) = story.host_name() {
                        ui.add_space(8.0);
                        ui.label(
                            RichText::new(format!("({})", host))
                                .color(self.theme.secondary_text)
                                .italics(),
                        );
                    }

                    if show_trash {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let trash_btn = ui.add_sized(
                                [32.0, 28.0],
                                egui::Button::new(
                                    RichText::new("🗑")
                                        .size(16.0)
                                        .color(self.theme.secondary_text),
                                )
                                .corner_radius(CornerRadius::same(6))
                                .fill(self.theme.button_background),
                            );

                            // Add tooltip for the delete button
                            if trash_btn.hovered() {
                                ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);

                                let tooltip_pos =
                                    trash_btn.rect.left_top() + egui::vec2(0.0, -30.0);

                                egui::Area::new(
                                    egui::Id::new("trash_tooltip_area")
                                        .with(story.story_id.clone()),
                                )
                                .order(egui::Order::Tooltip)
                                .fixed_pos(tooltip_pos)
                                .show(&ctx, |ui| {
                                    egui::Frame::popup(ui.style())
                                        .fill(self.theme.card_background)
                                        .stroke(Stroke::new(1.0, self.theme.separator))
                                        .corner_radius(CornerRadius::same(6))
                                        .show(ui, |ui| {
                                            ui.add(egui::Label::new("Delete Story"));
                                        });
                                });
                            }

                            if trash_btn.clicked() {
                                self.pending_delete = Some(story.story_id.clone());
                            }
                        });
                    }
                });

                // Bottom row with the byline
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("by {}", story.author))
                            .color(self.theme.secondary_text)
                            .size(14.0),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("posted by {}", story.username))
                            .color(self.theme.secondary_text)
                            .size(14.0),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let posted = story
                            .created_at
                            .with_timezone(&chrono::Local)
                            .format("%b %e, %Y")
                            .to_string();
                        ui.label(
                            RichText::new(posted)
                                .color(self.theme.secondary_text)
                                .size(13.0),
                        );
                    });
                });
            });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };

        let mut dismissed = false;

        egui::Window::new("alert")
            .id(egui::Id::new("alert_window"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(self.theme.card_background)
                    .stroke(Stroke::new(1.0, self.theme.separator))
                    .corner_radius(CornerRadius::same(8)),
            )
            .show(ctx, |ui| {
                ui.set_max_width(340.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new(&message).color(self.theme.text).size(15.0));
                    ui.add_space(12.0);

                    let ok_btn = ui.add_sized(
                        [80.0, 30.0],
                        egui::Button::new(
                            RichText::new("OK")
                                .size(14.0)
                                .color(self.theme.button_foreground),
                        )
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                    );

                    if ok_btn.clicked() {
                        dismissed = true;
                    }
                    ui.add_space(4.0);
                });
            });

        if dismissed {
            self.alert = None;
        }
    }
}
