use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{anyhow, Result};
use chrono::Local;
use eframe::egui::{self, Color32, RichText};
use omvetan_payroll::{LogLevel, Readiness, Session};

use crate::io::{pick_pdf_destination, pick_spreadsheet, spawn_import, spawn_initialize};
use crate::model::{FormState, UiMessage};

pub struct DesktopApp {
    session: Session,
    form: FormState,
    status: String,
    busy: bool,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let mut session = Session::new();
        session.begin_initialization();
        spawn_initialize(tx.clone());

        Self {
            session,
            form: FormState::default(),
            status: String::new(),
            busy: true,
            tx,
            rx,
        }
    }
}

impl DesktopApp {
    fn choose_file(&mut self) {
        let Some(path) = pick_spreadsheet() else {
            return;
        };
        self.import(path);
    }

    fn import(&mut self, path: PathBuf) {
        match self.session.begin_import(&path) {
            Ok(name) => {
                self.busy = true;
                spawn_import(path, name, self.tx.clone());
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn prepare(&mut self) {
        // 結果はアクティビティログに記録される
        let _ = self.session.prepare(&self.form.targets, &self.form.fields);
    }

    fn download_pdf(&mut self) -> Result<()> {
        let Some(path) = pick_pdf_destination(&self.session.config().file_prefix)? else {
            return Ok(());
        };
        let header = self.form.header.trim().to_string();
        let header = (!header.is_empty()).then_some(header);

        let report = self
            .session
            .export(&path, header.as_deref(), Local::now(), false)
            .map_err(|e| anyhow!("PDF出力に失敗: {e}"))?;
        self.status = format!("Saved {} ({} pages)", report.path.display(), report.pages);
        Ok(())
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Initialized(result) => {
                    self.session.complete_initialization(result);
                    if self.form.header.is_empty() {
                        self.form.header = self.session.config().slip_header.clone();
                    }
                    self.busy = false;
                }
                UiMessage::Imported { name, result } => {
                    let _ = self.session.apply_import(&name, result);
                    self.busy = false;
                }
            }
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        let ready = self.session.is_ready();

        ui.label(RichText::new("Data source").strong());
        ui.horizontal(|ui| {
            if ui.add_enabled(ready && !self.busy, egui::Button::new("Choose file...")).clicked() {
                self.choose_file();
            }
            match self.session.source_name() {
                Some(name) => ui.label(format!("{} ({} records)", name, self.session.records().len())),
                None => ui.label(RichText::new("No file loaded").color(Color32::from_gray(150))),
            };
        });
        ui.add_space(8.0);

        ui.label(RichText::new("Target names").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.form.targets)
                .hint_text("alice, bob or *")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        ui.label(RichText::new("Fields").strong());
        ui.add(
            egui::TextEdit::singleline(&mut self.form.fields)
                .hint_text("Basic, Net (blank for all columns)")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        ui.label(RichText::new("Slip header").strong());
        ui.add(egui::TextEdit::singleline(&mut self.form.header).desired_width(f32::INFINITY));
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            if ui.add_enabled(ready && !self.busy, egui::Button::new("Prepare records")).clicked() {
                self.prepare();
            }
            let can_download = !self.session.slips().is_empty();
            if ui.add_enabled(can_download, egui::Button::new("Download PDF")).clicked() {
                if let Err(err) = self.download_pdf() {
                    self.status = err.to_string();
                }
            }
        });
    }

    fn render_preview(&self, ui: &mut egui::Ui) {
        ui.heading("Preview");
        ui.separator();
        if self.session.slips().is_empty() {
            ui.label(RichText::new("No slips prepared.").color(Color32::from_gray(150)));
            return;
        }

        egui::ScrollArea::vertical()
            .id_source("preview")
            .max_height(ui.available_height() * 0.5)
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .min_col_width(120.0)
                    .show(ui, |ui| {
                        for slip in self.session.slips() {
                            ui.label(RichText::new(&slip.name).strong());
                            ui.label(format!("{} nodes mapped", slip.stats.len()));
                            ui.end_row();
                        }
                    });
            });
    }

    fn render_log(&self, ui: &mut egui::Ui) {
        ui.heading("Activity");
        ui.separator();
        egui::ScrollArea::vertical()
            .id_source("activity")
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in self.session.log() {
                    let color = match entry.level {
                        LogLevel::Info => Color32::from_gray(190),
                        LogLevel::Success => Color32::from_rgb(96, 196, 120),
                        LogLevel::Error => Color32::from_rgb(230, 96, 96),
                    };
                    ui.label(RichText::new(entry.to_string()).monospace().color(color));
                }
            });
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.busy {
            ctx.request_repaint();
        }
        self.poll_messages();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("OmVetan Payroll");
                ui.separator();
                let (text, color) = match self.session.readiness() {
                    Readiness::Uninitialized => ("Loading modules...".to_string(), Color32::from_gray(170)),
                    Readiness::Ready => ("Ready".to_string(), Color32::from_rgb(96, 196, 120)),
                    Readiness::Failed(reason) => (format!("Unavailable: {reason}"), Color32::from_rgb(230, 96, 96)),
                };
                ui.label(RichText::new(text).color(color));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(RichText::new(&self.status).color(Color32::from_rgb(246, 196, 69)));
                }
            });
        });

        egui::SidePanel::left("form").resizable(true).min_width(280.0).show(ctx, |ui| {
            ui.heading("Batch");
            ui.separator();
            self.render_form(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_preview(ui);
            ui.add_space(12.0);
            self.render_log(ui);
        });
    }
}
