//! Search, select and display flow
//!
//! tune round (repeated while the user types a new query)
//!   -> settings fetch -> setting round -> render
//!
//! A cancelled picker ends the flow at whichever round it happened in.

use crate::catalog_client::CatalogClient;
use crate::error::Result;
use crate::extractor;
use crate::render::Renderer;
use crate::selection::{self, Picker, SettingPick, TunePick};
use tracing::info;
use tunes_common::config::PickerConfig;
use tunes_common::{Tune, TuneSetting};

/// Where the first tune round gets its candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuneSource {
    /// Popular-tunes page
    Popular,
    /// Search results for the text
    Search(String),
}

/// How a session ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The chosen setting was handed to the renderer
    Displayed { tune: Tune, setting: TuneSetting },
    /// The picker exited with this non-zero code
    Cancelled(i32),
}

enum TuneChoice {
    Chosen(Tune),
    Cancelled(i32),
}

/// One interactive invocation
pub struct TuneSession<P, R> {
    catalog: CatalogClient,
    picker: P,
    picker_config: PickerConfig,
    renderer: R,
}

impl<P: Picker, R: Renderer> TuneSession<P, R> {
    pub fn new(
        catalog: CatalogClient,
        picker: P,
        picker_config: PickerConfig,
        renderer: R,
    ) -> Self {
        Self {
            catalog,
            picker,
            picker_config,
            renderer,
        }
    }

    pub async fn run(&self, source: TuneSource) -> Result<SessionOutcome> {
        let tune = match self.choose_tune(source).await? {
            TuneChoice::Chosen(tune) => tune,
            TuneChoice::Cancelled(code) => return Ok(SessionOutcome::Cancelled(code)),
        };
        info!(id = %tune.id, name = %tune.name, "Tune selected");

        let settings = self.tune_settings(&tune.id).await?;
        let pick =
            selection::select_setting(&self.picker, &self.picker_config, &settings).await?;
        let setting = match pick {
            SettingPick::Selected(setting) => setting,
            SettingPick::Cancelled(code) => return Ok(SessionOutcome::Cancelled(code)),
        };
        info!(
            setting = setting.id.as_deref().unwrap_or("?"),
            key = setting.key.as_deref().unwrap_or("?"),
            "Setting selected"
        );

        self.renderer.render(&setting.notation).await?;
        Ok(SessionOutcome::Displayed { tune, setting })
    }

    /// Tune rounds until one ends in a selection or a cancellation
    async fn choose_tune(&self, source: TuneSource) -> Result<TuneChoice> {
        let mut source = source;
        loop {
            let tunes = match &source {
                TuneSource::Popular => self.popular_tunes().await?,
                TuneSource::Search(query) => self.search_tunes(query).await?,
            };

            match selection::select_tune(&self.picker, &self.picker_config, &tunes).await? {
                TunePick::Selected(tune) => return Ok(TuneChoice::Chosen(tune)),
                TunePick::Cancelled(code) => return Ok(TuneChoice::Cancelled(code)),
                TunePick::Requery(query) => {
                    info!(query = %query, "Searching again");
                    source = TuneSource::Search(query);
                }
            }
        }
    }

    async fn popular_tunes(&self) -> Result<Vec<Tune>> {
        let markup = self.catalog.fetch_popular().await?;
        Ok(extractor::extract_popular(&markup))
    }

    async fn search_tunes(&self, query: &str) -> Result<Vec<Tune>> {
        let markup = self.catalog.fetch_search(query).await?;
        Ok(extractor::extract_search(&markup))
    }

    async fn tune_settings(&self, tune_id: &str) -> Result<Vec<TuneSetting>> {
        let markup = self.catalog.fetch_tune_detail(tune_id).await?;
        Ok(extractor::extract_settings(&markup))
    }
}
