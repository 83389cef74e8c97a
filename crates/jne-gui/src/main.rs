use chrono::{DateTime, Local};
use eframe::{App, egui};
use jne_core::{EditState, FileDocumentStore, StoreOptions, Workbench};
use std::path::{Path, PathBuf};

#[derive(Default)]
struct State {
    root_dir: Option<PathBuf>,
    documents: Vec<PathBuf>,
    selected_doc: Option<usize>,
    wb: Option<Workbench<FileDocumentStore>>,
    backup_on_save: bool,
    status: String,
    node_filter: String,
    modal_open: bool,
    last_save_time: Option<DateTime<Local>>,
}

impl State {
    fn clear_document(&mut self) {
        self.wb = None;
        self.modal_open = false;
        self.node_filter.clear();
    }
}

enum ModalAction {
    Edit,
    Cancel,
    Save,
}

struct AppGui {
    state: State,
}

impl AppGui {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: State {
                backup_on_save: true,
                ..Default::default()
            },
        }
    }
    fn pick_root_dir(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().set_directory(".").pick_folder() {
            self.state.documents = jne_core::documents::list_documents(&dir);
            self.state.status = format!("Found {} document(s)", self.state.documents.len());
            self.state.root_dir = Some(dir);
            self.state.selected_doc = None;
            self.state.clear_document();
        }
    }
    fn pick_file(&mut self) {
        if let Some(file) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_directory(".")
            .pick_file()
        {
            self.state.selected_doc = None;
            self.open_document(&file);
        }
    }
    fn open_document(&mut self, path: &Path) {
        self.state.clear_document();
        let options = StoreOptions {
            backup_on_save: self.state.backup_on_save,
        };
        match Workbench::open(FileDocumentStore::new(path, options)) {
            Ok(wb) => {
                self.state.status = format!(
                    "Loaded {} ({} nodes)",
                    path.display(),
                    wb.graph().nodes().len()
                );
                self.state.wb = Some(wb);
            }
            Err(e) => {
                log::error!("load {}: {}", path.display(), e);
                self.state.status = format!("Load error: {}", e);
            }
        }
    }
    fn reload(&mut self) {
        if let Some(wb) = &mut self.state.wb {
            match wb.reload() {
                Ok(()) => self.state.status = "Reloaded".into(),
                Err(e) => self.state.status = format!("Reload error: {}", e),
            }
        }
    }
}

impl App for AppGui {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open JSON File").clicked() {
                    self.pick_file();
                }
                if ui.button("Open Folder").clicked() {
                    self.pick_root_dir();
                }
                if ui.button("Reload").clicked() {
                    self.reload();
                }
                ui.separator();
                if ui
                    .checkbox(&mut self.state.backup_on_save, "Zip backup on save")
                    .changed()
                    && let Some(wb) = &mut self.state.wb
                {
                    wb.document_mut().options_mut().backup_on_save = self.state.backup_on_save;
                }
                if let Some(time) = self.state.last_save_time {
                    ui.label(format!("Last save: {}", time.format("%Y-%m-%d %H:%M:%S")));
                }
                ui.label(&self.state.status);
            });
        });

        egui::SidePanel::left("left").show(ctx, |ui| {
            if !self.state.documents.is_empty() {
                ui.heading("Documents");
                if let Some(root) = &self.state.root_dir {
                    ui.label(format!("Root: {}", root.display()));
                }
                let mut clicked_index: Option<usize> = None;
                egui::ScrollArea::vertical()
                    .id_source("documents_scroll")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        for (i, p) in self.state.documents.iter().enumerate() {
                            let sel = Some(i) == self.state.selected_doc;
                            let name = match &self.state.root_dir {
                                Some(root) => p.strip_prefix(root).unwrap_or(p).display().to_string(),
                                None => p.display().to_string(),
                            };
                            if ui.selectable_label(sel, name).clicked() {
                                clicked_index = Some(i);
                            }
                        }
                    });
                if let Some(i) = clicked_index {
                    self.state.selected_doc = Some(i);
                    let path = self.state.documents[i].clone();
                    self.open_document(&path);
                }
                ui.separator();
            }

            ui.heading("Nodes");
            ui.horizontal(|ui| {
                ui.label("Filter:");
                ui.text_edit_singleline(&mut self.state.node_filter);
            });
            let Some(wb) = &mut self.state.wb else {
                ui.label("No document loaded");
                return;
            };
            let filter = self.state.node_filter.to_lowercase();
            let selected_id = wb.graph().selected().map(|n| n.id.clone());
            let mut clicked: Option<String> = None;
            egui::ScrollArea::vertical()
                .id_source("nodes_scroll")
                .show(ui, |ui| {
                    for node in wb.graph().nodes() {
                        let label = node_label(node);
                        if !filter.is_empty() && !label.to_lowercase().contains(&filter) {
                            continue;
                        }
                        let sel = selected_id.as_deref() == Some(node.id.as_str());
                        if ui.selectable_label(sel, label).clicked() {
                            clicked = Some(node.id.clone());
                        }
                    }
                });
            if let Some(id) = clicked
                && wb.select(&id).is_ok()
            {
                self.state.modal_open = true;
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(wb) = &self.state.wb else {
                ui.label("Open a JSON file or a folder of JSON files to begin.");
                return;
            };
            ui.label(format!("Document: {}", wb.document().path().display()));
            ui.separator();
            egui::ScrollArea::both()
                .id_source("document_scroll")
                .show(ui, |ui| {
                    ui.add(egui::Label::new(egui::RichText::new(wb.parsed_text()).monospace()));
                });
        });

        self.node_modal(ctx);
    }
}

impl AppGui {
    fn node_modal(&mut self, ctx: &egui::Context) {
        let State {
            wb,
            modal_open,
            status,
            last_save_time,
            ..
        } = &mut self.state;
        let Some(wb) = wb.as_mut() else {
            return;
        };
        if wb.session().node().is_none() {
            return;
        }
        let was_open = *modal_open;
        let mut action: Option<ModalAction> = None;
        egui::Window::new("Node Content")
            .open(modal_open)
            .collapsible(false)
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                let session = wb.session();
                if let Some(node) = session.node() {
                    let location = match &node.path {
                        Some(_) if node.id.is_empty() => "(root)".to_string(),
                        Some(_) => node.id.clone(),
                        None => "(unknown path)".to_string(),
                    };
                    ui.label(format!("Path: {}", location));
                }
                ui.separator();
                let state = session.state();
                let can_edit = session.can_edit();
                egui::ScrollArea::vertical()
                    .id_source("snippet_scroll")
                    .max_height(360.0)
                    .show(ui, |ui| match state {
                        EditState::Viewing => {
                            ui.code(wb.session().normalized());
                        }
                        EditState::Editing | EditState::Saving => {
                            let saving = state == EditState::Saving;
                            ui.add_enabled(
                                !saving,
                                egui::TextEdit::multiline(wb.session_mut().draft_mut())
                                    .code_editor()
                                    .desired_rows(12)
                                    .desired_width(f32::INFINITY),
                            );
                        }
                    });
                if let Some(err) = wb.session().error() {
                    ui.colored_label(egui::Color32::RED, err);
                }
                ui.separator();
                ui.horizontal(|ui| match state {
                    EditState::Viewing => {
                        if ui.add_enabled(can_edit, egui::Button::new("Edit")).clicked() {
                            action = Some(ModalAction::Edit);
                        }
                    }
                    EditState::Editing | EditState::Saving => {
                        let saving = state == EditState::Saving;
                        if ui.add_enabled(!saving, egui::Button::new("Cancel")).clicked() {
                            action = Some(ModalAction::Cancel);
                        }
                        let label = if saving { "Saving..." } else { "Save" };
                        if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
                            action = Some(ModalAction::Save);
                        }
                    }
                });
            });
        match action {
            Some(ModalAction::Edit) => {
                wb.session_mut().start_editing();
            }
            Some(ModalAction::Cancel) => wb.session_mut().cancel(),
            Some(ModalAction::Save) => match wb.save() {
                Ok(()) => {
                    *status = "Saved".into();
                    *last_save_time = Some(Local::now());
                    if let Some(b) = wb.document().last_backup() {
                        *status = format!("Saved (backup {})", b.display());
                    }
                }
                Err(e) if e.is_user_error() => {}
                Err(e) => *status = format!("Save error: {}", e),
            },
            None => {}
        }
        if was_open && !*modal_open {
            let id = wb.session().node().map(|n| n.id.clone());
            if let Some(id) = id {
                // closing discards the draft; reopening starts from the stored value
                if let Err(e) = wb.select(&id) {
                    *status = format!("Select error: {}", e);
                }
            }
        }
    }
}

fn node_label(node: &jne_core::NodeSnapshot) -> String {
    let id = if node.id.is_empty() { "(root)" } else { node.id.as_str() };
    let preview = jne_core::normalize(&node.fields)
        .unwrap_or_default()
        .replace('\n', " ");
    let preview: String = preview.chars().take(40).collect();
    format!("{}  {}", id, preview)
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let native_options = eframe::NativeOptions {
        viewport: egui::viewport::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "JSON Node Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(AppGui::new(cc)))),
    )
}
