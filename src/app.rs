//! Application orchestration for photo sweeps and price migration.

use crate::dataurl;
use crate::image::{OptimizeService, SizeProfile, WebpOptimizer};
use crate::models::{Config, ListingKind, PriceRange, Role, SweepReport};
use crate::store::{ListingStore, PhotoRow, RestStore};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Coordinates the optimizer and the marketplace store for batch runs.
pub struct App {
    optimizer: Box<dyn OptimizeService>,
    store: Box<dyn ListingStore>,
    role: Role,
    dry_run: bool,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub optimizer: Box<dyn OptimizeService>,
    pub store: Box<dyn ListingStore>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks.
    pub fn with_services(services: AppServices, role: Role, dry_run: bool) -> Self {
        Self {
            optimizer: services.optimizer,
            store: services.store,
            role,
            dry_run,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new(config: &Config) -> Self {
        if config.dry_run {
            info!("DRY_RUN enabled, row updates will be skipped");
        }

        Self::with_services(
            AppServices {
                optimizer: Box::new(WebpOptimizer::new()),
                store: Box::new(RestStore::new(
                    config.api_url.clone(),
                    config.service_key.clone(),
                )),
            },
            config.role,
            config.dry_run,
        )
    }

    fn require_admin(&self, operation: &str) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(Error::Generic(format!(
                "{} requires the admin role (current role: {})",
                operation, self.role
            )))
        }
    }

    /// Re-encode one batch of a table's inline photos that are not yet
    /// WebP. Rows that fail are recorded in the report and the batch
    /// continues.
    pub async fn sweep_photos(&self, kind: ListingKind, batch_size: usize) -> Result<SweepReport> {
        self.require_admin("Photo sweep")?;

        let rows = self.store.fetch_unoptimized_photos(kind, batch_size).await?;
        info!("Found {} {} photos to optimize", rows.len(), kind);

        let mut report = SweepReport::new(kind);
        for row in rows {
            // Photos already uploaded to object storage are referenced
            // by URL and are not ours to rewrite.
            if !dataurl::is_image(&row.photo_url) {
                report.skipped += 1;
                continue;
            }

            match self.reencode_photo(kind, &row).await {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    warn!("[{}] Row {} failed: {}", kind, row.id, e);
                    report.errors.push(format!("{}: {}", row.id, e));
                }
            }
        }

        info!(
            "[{}] Sweep complete: {} processed, {} skipped, {} errors",
            kind,
            report.processed,
            report.skipped,
            report.errors.len()
        );
        Ok(report)
    }

    async fn reencode_photo(&self, kind: ListingKind, row: &PhotoRow) -> Result<()> {
        let (_, bytes) = dataurl::decode(&row.photo_url)?;
        let optimized = self
            .optimizer
            .optimize(&bytes, SizeProfile::for_listing(kind))
            .await?;
        let data_url = dataurl::encode_webp(&optimized.bytes);

        info!(
            "[{}] Row {}: {:.1}KB -> {:.1}KB at {}x{}",
            kind,
            row.id,
            row.photo_url.len() as f64 / 1024.0,
            data_url.len() as f64 / 1024.0,
            optimized.width,
            optimized.height
        );

        if !self.dry_run {
            self.store.update_photo(kind, row.id, &data_url).await?;
        }
        Ok(())
    }

    /// Convert one batch of legacy free-text prices to structured
    /// ranges. Unparseable strings are recorded as row errors.
    pub async fn migrate_prices(&self, kind: ListingKind, batch_size: usize) -> Result<SweepReport> {
        self.require_admin("Price migration")?;

        let rows = self.store.fetch_legacy_prices(kind, batch_size).await?;
        info!("Found {} {} rows with legacy prices", rows.len(), kind);

        let mut report = SweepReport::new(kind);
        for row in rows {
            let outcome = match PriceRange::parse_legacy(&row.price) {
                Ok(range) if self.dry_run => {
                    info!("[{}] Row {}: '{}' -> {:?} (dry run)", kind, row.id, row.price, range);
                    Ok(())
                }
                Ok(range) => self.store.update_price(kind, row.id, range).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    warn!("[{}] Row {} failed: {}", kind, row.id, e);
                    report.errors.push(format!("{}: {}", row.id, e));
                }
            }
        }

        info!(
            "[{}] Migration complete: {} processed, {} errors",
            kind,
            report.processed,
            report.errors.len()
        );
        Ok(report)
    }
}

/// Optimize a single on-disk image and write the WebP next to it.
///
/// Returns the output path. An input already named `*.webp` gets an
/// `.optimized.webp` suffix instead of being overwritten in place.
pub async fn optimize_file(
    optimizer: &dyn OptimizeService,
    path: &Path,
    profile: SizeProfile,
) -> Result<PathBuf> {
    let data = fs::read(path)?;
    let optimized = optimizer.optimize(&data, profile).await?;

    let mut output = path.with_extension("webp");
    if output == path {
        output = path.with_extension("optimized.webp");
    }

    info!(
        "Optimized {}: {:.1}KB -> {:.1}KB at {}x{}",
        path.display(),
        data.len() as f64 / 1024.0,
        optimized.bytes.len() as f64 / 1024.0,
        optimized.width,
        optimized.height
    );

    fs::write(&output, &optimized.bytes)?;
    Ok(output)
}
