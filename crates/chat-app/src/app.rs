//! Main egui application: composes the panels and drives the controller.

use std::rc::Rc;

use egui::{self, CentralPanel, SidePanel};

use chat_core::controller::ConversationController;
use chat_core::event_bus::EventBus;
use chat_core::state::ChatState;
use chat_platform::navigation::{current_route, BrowserNavigator, RouteWatcher};
use chat_platform::{BrowserSpawner, HttpBackend};
use chat_types::config::ClientConfig;
use chat_types::library::{CandidateFilter, TemplateFilter};
use chat_ui::panels::{conversation, library, sidebar, UiAction};
use chat_ui::state::UiState;
use chat_ui::theme;
use chat_ui::view::FrameView;

pub struct ChatApp {
    ui_state: UiState,
    controller: Rc<ConversationController>,
    routes: Option<RouteWatcher>,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        let backend = Rc::new(HttpBackend::new(config));

        // chunks arrive between frames; wake egui for each
        let events = EventBus::new();
        let ctx = cc.egui_ctx.clone();
        events.set_notifier(move || ctx.request_repaint());

        let controller = Rc::new(ConversationController::new(
            ChatState::shared(),
            backend.clone(),
            backend,
            Rc::new(BrowserNavigator::new()),
            Rc::new(BrowserSpawner),
            events,
        ));

        let routes = match RouteWatcher::install() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log::warn!("Back/forward navigation unavailable: {}", e);
                None
            }
        };

        controller.start(current_route());

        Self {
            ui_state: UiState::new(),
            controller,
            routes,
            first_frame: true,
        }
    }

    fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::NewChat => self.controller.new_chat(),
            UiAction::Select(id) => self.controller.select_conversation(&id),
            UiAction::Send(text) => {
                let outcome = self.controller.send(&text);
                if !outcome.is_sent() {
                    log::debug!("Send not dispatched: {:?}", outcome);
                }
            }
            UiAction::Attach(kind, id) => self.controller.attach(kind, id),
            UiAction::ClearAttachments => self.controller.clear_attachments(),
            UiAction::Upload(upload) => {
                let controller = self.controller.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    if let Ok(descriptor) = controller.attach_upload(upload).await {
                        log::info!("Attached upload {}", descriptor.id);
                    }
                });
            }
            UiAction::LoadTemplates { job_title } => {
                let controller = self.controller.clone();
                let filter = TemplateFilter {
                    job_title,
                    ..TemplateFilter::default()
                };
                wasm_bindgen_futures::spawn_local(async move {
                    controller.load_templates(&filter).await;
                });
            }
            UiAction::LoadCandidates { search } => {
                let controller = self.controller.clone();
                let filter = CandidateFilter {
                    search,
                    ..CandidateFilter::default()
                };
                wasm_bindgen_futures::spawn_local(async move {
                    controller.load_candidates(&filter).await;
                });
            }
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        let events = self.controller.events().drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
        }

        if let Some(route) = self.routes.as_ref().and_then(RouteWatcher::take) {
            self.controller.open_route(route);
        }

        let mut actions = {
            let dropped = ctx.input(|i| i.raw.dropped_files.clone());
            library::dropped_uploads(&dropped, self.ui_state.upload_kind)
        };

        // snapshot, so no borrow of the shared state outlives this line
        let view = FrameView::project(&self.controller.state().borrow());

        SidePanel::left("sidebar")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                actions.extend(sidebar::sidebar_panel(ui, &view.sidebar));
            });

        if self.ui_state.show_library {
            SidePanel::right("library")
                .min_width(240.0)
                .max_width(320.0)
                .show(ctx, |ui| {
                    actions.extend(library::library_panel(ui, &mut self.ui_state, &view));
                });
        }

        CentralPanel::default().show(ctx, |ui| {
            actions.extend(conversation::conversation_panel(ui, &mut self.ui_state, &view));
        });

        for action in actions {
            self.handle(action);
        }
    }
}

impl Drop for ChatApp {
    fn drop(&mut self) {
        // the view is going away; stop any reply mid-stream
        self.controller.teardown();
    }
}
