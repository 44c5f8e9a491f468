use std::{
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use egui::Context;
use egui_extras::install_image_loaders;
use itinerary::{
    clock::{Clock, SystemClock},
    config::TrackerConfig,
    feed,
    loader::{ItineraryLoader, LoadState},
    timer::{Timer, TimerHandle},
};
use log::{debug, error, warn};
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Position, Tiles};

use crate::{
    plugins,
    state::{SelectionState, ViewState},
    widgets::{WidgetDestination, WidgetStatus},
    windows,
};

/// The main application struct: a map with one marker per destination,
/// re-projected on every refresh tick.
pub struct TrackerApp {
    tiles: Box<dyn Tiles>,
    map_memory: MapMemory,
    center: Position,
    selection_state: Rc<RefCell<SelectionState>>,
    view_state: ViewState,
    destination_widget: Option<WidgetDestination>,
    status_widget: WidgetStatus,
    loader: Option<ItineraryLoader>,
    sampled_now: Arc<Mutex<DateTime<Utc>>>,
    timer: Option<TimerHandle>,
    refresh_interval: Duration,
    last_update: Instant,
}

impl TrackerApp {
    /// Creates the app, starting the itinerary fetch and the refresh timer.
    pub fn new(egui_ctx: Context, config: &TrackerConfig) -> Self {
        install_image_loaders(&egui_ctx);
        let mut initial_map_memory = MapMemory::default();
        if initial_map_memory.set_zoom(config.map.zoom).is_err() {
            warn!("Ignoring invalid zoom level {}", config.map.zoom);
        }

        let loader = feed::open(&config.feed).and_then(|feed| {
            let ctx = egui_ctx.clone();
            ItineraryLoader::spawn(feed, move || ctx.request_repaint())
        });
        let loader = match loader {
            Ok(loader) => Some(loader),
            Err(e) => {
                error!("Could not start loading the itinerary: {e}");
                None
            }
        };

        let now = SystemClock.now();
        let sampled_now = Arc::new(Mutex::new(now));
        let refresh_interval = config.refresh.interval();

        let timer = Timer::new(SystemClock, refresh_interval).start({
            let sampled_now = Arc::clone(&sampled_now);
            let ctx = egui_ctx.clone();
            move |now, tick| {
                if let Ok(mut sample) = sampled_now.lock() {
                    *sample = now;
                }
                debug!("Refresh tick {tick} at {now}");
                ctx.request_repaint();
            }
        });
        let timer = match timer {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Refresh timer unavailable, refreshing from the UI loop: {e}");
                None
            }
        };

        Self {
            tiles: Box::new(HttpTiles::with_options(
                walkers::sources::OpenStreetMap,
                HttpOptions::default(),
                egui_ctx.to_owned(),
            )),
            map_memory: initial_map_memory,
            center: Position::from_lat_lon(config.map.center_lat, config.map.center_lon),
            selection_state: Rc::new(RefCell::new(SelectionState::new())),
            view_state: ViewState::new(now),
            destination_widget: None,
            status_widget: WidgetStatus,
            loader,
            sampled_now,
            timer,
            refresh_interval,
            last_update: Instant::now(),
        }
    }

    fn sampled_now(&self) -> DateTime<Utc> {
        match self.sampled_now.lock() {
            Ok(sample) => *sample,
            Err(_) => SystemClock.now(),
        }
    }

    fn load_state(&self) -> LoadState {
        match &self.loader {
            Some(loader) => loader.state(),
            None => LoadState::Unavailable("loader not running".to_string()),
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.timer.is_none() {
            if self.last_update.elapsed() >= self.refresh_interval {
                if let Ok(mut sample) = self.sampled_now.lock() {
                    *sample = SystemClock.now();
                }
                self.last_update = Instant::now();
            }
            ctx.request_repaint_after(self.refresh_interval);
        }

        let itinerary = self.loader.as_ref().and_then(|loader| loader.latest());
        let now = self.sampled_now();
        if self.view_state.refresh(itinerary, now) {
            debug!(
                "Projected {} destinations at {}",
                self.view_state.projection.destinations.len(),
                now
            );
        }

        let load_state = self.load_state();

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let tiles = self.tiles.as_mut();

                let destinations_plugin = plugins::Destinations::new(
                    &self.view_state.projection.destinations,
                    self.selection_state.clone(),
                );

                let map = Map::new(Some(tiles), &mut self.map_memory, self.center)
                    .with_plugin(destinations_plugin);

                ui.add(map);

                let selected = self.selection_state.borrow().destination.clone();
                match selected.as_deref().and_then(|id| self.view_state.destination(id)) {
                    Some(destination) => {
                        let stale = self
                            .destination_widget
                            .as_ref()
                            .map_or(true, |widget| widget.selected_destination != destination.id);
                        if stale {
                            self.destination_widget = Some(WidgetDestination::new(&destination.id));
                        }

                        if let Some(widget) = &mut self.destination_widget {
                            if !widget.show(ctx, destination) {
                                self.selection_state.borrow_mut().destination = None;
                                self.destination_widget = None;
                            }
                        }
                    }
                    None => {
                        self.selection_state.borrow_mut().destination = None;
                        self.destination_widget = None;
                    }
                }

                self.status_widget
                    .show(ctx, &load_state, &self.view_state.projection);

                windows::zoom(ui, &mut self.map_memory);
            });
    }
}
