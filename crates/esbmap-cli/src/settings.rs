use std::num::NonZeroUsize;

use esbmap_core::{AppConfig, MatchFilter};
use esbmap_loader::SourcePaths;

use crate::SourceArgs;

/// Everything one command run needs, after command-line overrides are
/// applied on top of the environment configuration.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) paths: SourcePaths,
    pub(crate) max_points: NonZeroUsize,
    pub(crate) filter: MatchFilter,
}

impl RunSettings {
    /// # Errors
    ///
    /// Returns an error if the resulting confidence or distance bound is out
    /// of range.
    pub(crate) fn resolve(config: &AppConfig, args: &SourceArgs) -> anyhow::Result<Self> {
        let defaults = SourcePaths::from_config(config);
        let paths = SourcePaths {
            esb: args.esb.clone().unwrap_or(defaults.esb),
            scraper: args.scraper.clone().unwrap_or(defaults.scraper),
            matches: args.matches.clone().unwrap_or(defaults.matches),
        };

        let filter = MatchFilter::new(
            args.min_confidence
                .unwrap_or(config.match_filter.min_confidence()),
            args.max_distance
                .unwrap_or(config.match_filter.max_distance()),
        )?;

        Ok(Self {
            paths,
            max_points: args.max_points.unwrap_or(config.max_points),
            filter,
        })
    }
}
