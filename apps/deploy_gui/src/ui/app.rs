use std::time::Duration;

use client_core::{ClipboardSink, SubmissionController, SystemClipboard};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::DeploymentResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::submit_current_input;

const URL_HINT: &str = "https://github.com/username/repo";

pub struct DeployApp {
    controller: SubmissionController,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    clipboard: Box<dyn ClipboardSink>,
    status: String,
    focus_requested: bool,
}

impl DeployApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self::with_clipboard(cmd_tx, ui_rx, Box::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            controller: SubmissionController::new(),
            cmd_tx,
            ui_rx,
            clipboard,
            status: "Backend worker starting...".to_string(),
            focus_requested: false,
        }
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            event.apply(&mut self.controller, &mut self.status);
        }
    }

    fn deploy(&mut self) {
        submit_current_input(&mut self.controller, &self.cmd_tx, &mut self.status);
    }

    fn copy_deployment_url(&mut self, url: &str) {
        self.status = if self.controller.copy(self.clipboard.as_mut(), url) {
            "Deployment URL copied to clipboard".to_string()
        } else {
            "Could not copy to clipboard".to_string()
        };
    }

    fn show_navbar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Zenith").strong());
            });
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(self.status()).weak());
            });
        });
    }

    fn show_hero(ui: &mut egui::Ui) {
        ui.add_space((ui.available_height() * 0.25).clamp(12.0, 120.0));
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Deployments\nmade easy").size(44.0).strong());
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new(
                    "Instantly deploy your sites to production with one click, no configuration required.",
                )
                .weak()
                .size(16.0),
            );
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.add_space((ui.available_height() * 0.15).clamp(12.0, 90.0));
        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::symmetric(20, 18))
            .show(ui, |ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                ui.heading("Deploy your project");
                ui.weak("Enter your GitHub repository URL to deploy in seconds");
                ui.add_space(8.0);

                ui.label(egui::RichText::new("GitHub Repository URL").strong());
                let edit = egui::TextEdit::singleline(self.controller.input_mut())
                    .id_salt("github_url")
                    .hint_text(URL_HINT)
                    .desired_width(f32::INFINITY);
                let response = ui.add_sized([ui.available_width(), 34.0], edit);
                if !self.focus_requested {
                    self.focus_requested = true;
                    response.request_focus();
                }

                if let Some(message) = self.controller.state().error_message() {
                    let error_color = ui.visuals().error_fg_color;
                    ui.colored_label(error_color, message);
                }

                let busy = self.controller.state().is_busy();
                let enter_pressed =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let clicked = ui
                    .horizontal(|ui| {
                        let label = if busy {
                            ui.spinner();
                            "Deploying..."
                        } else {
                            "Deploy Project"
                        };
                        let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
                            .min_size(egui::vec2(ui.available_width(), 40.0));
                        ui.add_enabled(!busy, button).clicked()
                    })
                    .inner;

                if clicked || (enter_pressed && !busy) {
                    self.deploy();
                }

                if let Some(result) = self.controller.state().result().cloned() {
                    ui.add_space(12.0);
                    self.show_result(ui, &result);
                }
            });
    }

    fn show_result(&mut self, ui: &mut egui::Ui, result: &DeploymentResult) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(
                egui::RichText::new("✔ Deployment Successful")
                    .strong()
                    .color(egui::Color32::from_rgb(34, 197, 94)),
            );

            ui.weak("Repository");
            ui.label(egui::RichText::new(&result.repository_id).strong());

            ui.weak("Deployment URL");
            ui.horizontal(|ui| {
                let mut url = result.deployment_url.as_str();
                ui.add(
                    egui::TextEdit::singleline(&mut url)
                        .id_salt("deployment_url")
                        .desired_width(ui.available_width() - 60.0),
                );
                if ui.button("Copy").clicked() {
                    self.copy_deployment_url(&result.deployment_url);
                }
            });

            egui::CollapsingHeader::new("Build details")
                .id_salt("build_details")
                .show(ui, |ui| {
                    ui.monospace(build_details(result));
                });

            ui.add(
                egui::Hyperlink::from_label_and_url("Visit Website", &result.deployment_url)
                    .open_in_new_tab(true),
            );
        });
    }
}

fn build_details(result: &DeploymentResult) -> String {
    serde_json::to_string_pretty(&result.build_metadata)
        .unwrap_or_else(|_| result.build_metadata.to_string())
}

impl eframe::App for DeployApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_navbar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                Self::show_hero(&mut columns[0]);
                self.show_form(&mut columns[1]);
            });
        });

        if self.controller().state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
