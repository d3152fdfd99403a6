use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use pharm_core::{
    MergeStats, PharmacyRegistry, RegistrySummary, convert_eulji, convert_gapji, report_date,
    run_shortage,
};
use pharm_model::SupplyKind;
use pharm_report::{
    ArtifactStore, Manifest, TemplateSet, Token, render_preview, shortage_output_name,
    write_shortage_workbook, write_supply_workbook,
};
use tracing::{info, info_span, trace, warn};

use pharm_cli::config::AppConfig;
use pharm_cli::input::{is_stdin, load_table, read_nonblank_text};
use pharm_cli::logging::redact_value;

use crate::cli::{ShortageArgs, SupplyArgs};
use crate::types::{ShortageRun, SupplyFileSummary, SupplyRun};

fn open_store(config: &AppConfig) -> Result<ArtifactStore> {
    ArtifactStore::open(&config.artifact_dir, config.artifact_ttl())
        .with_context(|| format!("open artifact store {}", config.artifact_dir.display()))
}

fn open_registry(config: &AppConfig) -> Result<PharmacyRegistry> {
    PharmacyRegistry::open(&config.registry_path)
        .with_context(|| format!("open pharmacy registry {}", config.registry_path.display()))
}

fn copy_out(dir: &Path, files: &[(String, Vec<u8>)]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for (name, bytes) in files {
        let path = dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

fn supply_artifact_kind(kind: SupplyKind) -> &'static str {
    match kind {
        SupplyKind::Gapji => "supply-gapji",
        SupplyKind::Eulji => "supply-eulji",
    }
}

pub fn run_supply(args: &SupplyArgs, config: &AppConfig) -> Result<SupplyRun> {
    let kind = SupplyKind::from(args.kind);
    let span = info_span!("supply", %kind);
    let _guard = span.enter();

    let text = read_nonblank_text(&args.input, kind.label())?;
    let date = report_date(Local::now().date_naive(), config.report_date_offset_days);
    let reports = match kind {
        SupplyKind::Gapji => {
            let registry = open_registry(config)?;
            convert_gapji(&text, &registry, &date)?
        }
        SupplyKind::Eulji => convert_eulji(&text, &date)?,
    };

    let templates = TemplateSet::new(&config.template_dir);
    let mut files = Vec::with_capacity(reports.len());
    let mut summaries = Vec::with_capacity(reports.len());
    for report in &reports {
        let header = templates
            .header(report.kind, report.direction)
            .with_context(|| format!("template for {}", report.file_name))?;
        let bytes = write_supply_workbook(report, header.as_deref())
            .with_context(|| format!("write {}", report.file_name))?;
        summaries.push(SupplyFileSummary {
            file_name: report.file_name.clone(),
            direction: report.direction,
            rows: report.height(),
            from_template: header.is_some(),
        });
        files.push((report.file_name.clone(), bytes));
    }

    if files.is_empty() {
        warn!("no rows with supply kind 1 or 2; nothing stored");
        return Ok(SupplyRun {
            kind,
            report_date: date,
            files: summaries,
            token: None,
            copied_to: None,
        });
    }

    let store = open_store(config)?;
    let token = store.put(supply_artifact_kind(kind), &files)?;
    if let Some(dir) = &args.out {
        copy_out(dir, &files)?;
    }
    info!(%token, files = files.len(), "supply workbooks ready");

    Ok(SupplyRun {
        kind,
        report_date: date,
        files: summaries,
        token: Some(token),
        copied_to: args.out.clone(),
    })
}

pub fn run_shortage_command(args: &ShortageArgs, config: &AppConfig) -> Result<ShortageRun> {
    if is_stdin(&args.stock) && is_stdin(&args.requests) {
        bail!("--stock and --requests cannot both read standard input");
    }
    let span = info_span!("shortage_submission");
    let _guard = span.enter();

    let stock = load_table(&args.stock, "stock")?;
    let requests = load_table(&args.requests, "request")?;
    let outcome = run_shortage(&stock, &requests)?;
    for row in &outcome.rows {
        trace!(
            center = %row.center,
            pharmacy = redact_value(&row.pharmacy_name),
            pharmacist = redact_value(&row.pharmacist_name),
            slots = row.slot_count(),
            "shortage row"
        );
    }

    let file_name = shortage_output_name(Local::now().naive_local());
    let bytes = write_shortage_workbook(&outcome.groups).context("write shortage workbook")?;
    let files = vec![(file_name.clone(), bytes)];

    let store = open_store(config)?;
    let token = store.put("shortage", &files)?;
    if let Some(dir) = &args.out {
        copy_out(dir, &files)?;
    }
    if let Some(path) = &args.preview {
        let html = render_preview(outcome.table.frame())?;
        fs::write(path, html).with_context(|| format!("write preview {}", path.display()))?;
    }

    Ok(ShortageRun {
        stats: outcome.stats,
        max_slots: outcome.table.max_slots(),
        centers: outcome
            .groups
            .iter()
            .map(|group| (group.center.clone(), group.frame.height()))
            .collect(),
        file_name,
        token,
        preview: args.preview.clone(),
        copied_to: args.out.clone(),
    })
}

pub fn run_registry_show(config: &AppConfig) -> Result<RegistrySummary> {
    Ok(open_registry(config)?.summary())
}

pub fn run_registry_update(input: &Path, config: &AppConfig) -> Result<(MergeStats, RegistrySummary)> {
    let text = read_nonblank_text(input, "registry")?;
    let mut registry = open_registry(config)?;
    let stats = registry
        .update_from_paste(&text)
        .context("update pharmacy registry")?;
    Ok((stats, registry.summary()))
}

pub fn run_artifacts_list(config: &AppConfig) -> Result<Vec<Manifest>> {
    Ok(open_store(config)?.list())
}

pub fn run_artifacts_fetch(
    token: &str,
    name: &str,
    dest: Option<&Path>,
    config: &AppConfig,
) -> Result<PathBuf> {
    let token: Token = token.parse()?;
    let store = open_store(config)?;
    let source = store.get(token, name)?;

    let dest_dir = dest.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dest_dir).with_context(|| format!("create {}", dest_dir.display()))?;
    let target = dest_dir.join(name);
    fs::copy(&source, &target)
        .with_context(|| format!("copy {} to {}", source.display(), target.display()))?;
    Ok(target)
}

pub fn run_artifacts_sweep(config: &AppConfig) -> Result<usize> {
    Ok(open_store(config)?.sweep(Utc::now())?)
}
