use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use collector_core::{CrawlReport, Effect, Msg};
use collector_engine::{save_link_list, CrawlController, CrawlEvent};
use engine_logging::{engine_error, engine_info, engine_warn};

/// Executes core effects against the crawl controller and the file system.
///
/// Results come back as `Msg`s on the app's message channel.
pub struct EffectRunner {
    controller: CrawlController,
    output_dir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
    force_stop_at: Option<Instant>,
}

impl EffectRunner {
    pub fn new(controller: CrawlController, output_dir: PathBuf, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            controller,
            output_dir,
            msg_tx,
            force_stop_at: None,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCrawl(request) => {
                    if let Err(err) = self.controller.start(request) {
                        engine_error!("Could not start crawl: {}", err);
                        self.send(Msg::CrawlFinished(CrawlReport::failed(err.to_string())));
                    }
                }
                Effect::CancelCrawl => self.controller.cancel(),
                Effect::ScheduleForceStop { grace } => {
                    self.force_stop_at = Some(Instant::now() + grace);
                }
                Effect::AbandonCrawl => {
                    self.force_stop_at = None;
                    self.controller.abandon();
                }
                Effect::SaveLinks { links, filename } => {
                    let result = save_link_list(&self.output_dir, &filename, &links)
                        .map(|path| path.display().to_string())
                        .map_err(|err| {
                            engine_error!("Failed to save {}: {}", filename, err);
                            err.to_string()
                        });
                    self.send(Msg::SaveFinished(result));
                }
            }
        }
    }

    /// Forward pending worker events and fire an expired force-stop deadline.
    pub fn pump(&mut self) {
        while let Some(event) = self.controller.try_recv() {
            if let Some(msg) = self.event_to_msg(event) {
                self.send(msg);
            }
        }
        if let Some(deadline) = self.force_stop_at {
            if Instant::now() >= deadline {
                self.force_stop_at = None;
                self.send(Msg::ForceStopElapsed);
            }
        }
    }

    fn event_to_msg(&mut self, event: CrawlEvent) -> Option<Msg> {
        match event {
            CrawlEvent::Started { start_url } => {
                engine_info!("Crawl worker started on {}", start_url);
                None
            }
            CrawlEvent::Visiting { url, .. } => Some(Msg::Progress {
                current_url: Some(url),
                found_count: self.controller.snapshot().found_count,
            }),
            CrawlEvent::PageDone {
                url, found_count, ..
            } => Some(Msg::Progress {
                current_url: Some(url),
                found_count,
            }),
            CrawlEvent::PageFailed { .. } => None,
            CrawlEvent::Finished(report) => {
                self.force_stop_at = None;
                Some(Msg::CrawlFinished(report))
            }
        }
    }

    fn send(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            engine_warn!("Message channel closed; dropping effect result");
        }
    }
}
