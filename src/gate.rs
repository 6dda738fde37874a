//! One gate run: load, parse, aggregate, evaluate, report.

use anyhow::Result;
use rayon::prelude::*;

use crate::config::GateConfig;
use crate::corpus::{Corpus, RegistrySource, Source};
use crate::finding::Finding;
use crate::model::{ModelOptions, Registries, SiteModel};
use crate::page::{Page, ParseOptions, parse_page};
use crate::registry::{
    Manifest, Registry, RegistryKind, Sitemap, parse_manifest, parse_registry, parse_sitemap,
};
use crate::report::Report;
use crate::rules::{RULES, evaluate};
use crate::utils::path::route::route_for_file;
use crate::utils::plural_count;
use crate::{debug, log};

/// Run the gate over the configured root.
///
/// Only an invalid root aborts; everything else ends up in the report.
pub fn run(config: &GateConfig) -> Result<Report> {
    let mut corpus = Corpus::load(config.get_root(), &config.corpus, &config.registry)?;
    let mut findings = std::mem::take(&mut corpus.findings);

    let suffixes: Vec<String> = config
        .corpus
        .markup_suffixes
        .iter()
        .map(|s| s.to_ascii_lowercase())
        .collect();

    let (pages, page_findings) = parse_pages(&corpus, &suffixes);
    findings.extend(page_findings);

    let registries = load_registries(&corpus, &config.registry.term_prefixes, &mut findings);
    let sitemap = load_sitemap(&corpus.sitemap, &mut findings);

    let options = ModelOptions {
        site_url: config.site.parsed_url(),
        markup_suffixes: suffixes,
    };
    let files = std::mem::take(&mut corpus.files);
    let (model, model_findings) = SiteModel::build(pages, registries, sitemap, files, options);
    findings.extend(model_findings);

    debug!("gate"; "{} dropped for noindex", plural_count(model.noindex_count(), "page"));
    log!(
        "gate";
        "checking {} against {} rules",
        plural_count(model.pages().len(), "page"),
        RULES.len()
    );

    findings.extend(evaluate(&model));

    for finding in &mut findings {
        finding.severity = config.rules.effective(finding.rule, finding.severity);
    }

    Ok(Report::new(findings))
}

/// Read and parse every page file on the rayon pool, in path order.
fn parse_pages(corpus: &Corpus, suffixes: &[String]) -> (Vec<Page>, Vec<Finding>) {
    let options = ParseOptions {
        markup_suffixes: suffixes.to_vec(),
    };

    let results: Vec<_> = corpus
        .page_paths
        .par_iter()
        .map(|rel_path| {
            let text = corpus.read_page(rel_path)?;
            let route = route_for_file(rel_path, suffixes);
            Ok(parse_page(rel_path, &route, &text, &options))
        })
        .collect::<Vec<Result<_, Finding>>>();

    let mut pages = Vec::with_capacity(results.len());
    let mut findings = Vec::new();
    for result in results {
        match result {
            Ok(parsed) => {
                if parsed.page.partial {
                    debug!("page"; "{} parsed partially", parsed.page.path);
                }
                pages.push(parsed.page);
                findings.extend(parsed.findings);
            }
            Err(finding) => findings.push(finding),
        }
    }
    (pages, findings)
}

fn load_registries(
    corpus: &Corpus,
    term_prefixes: &[String],
    findings: &mut Vec<Finding>,
) -> Registries {
    let manifest = match corpus.registry(RegistryKind::Manifest) {
        Some(source) => load_manifest(source, findings),
        None => Manifest::missing(""),
    };
    let mut load = |kind| match corpus.registry(kind) {
        Some(source) => load_registry(source, term_prefixes, findings),
        None => Registry::missing(kind),
    };
    let terms = load(RegistryKind::Terms);
    let documents = load(RegistryKind::Documents);

    Registries {
        manifest,
        terms,
        documents,
    }
}

fn load_manifest(source: &RegistrySource, findings: &mut Vec<Finding>) -> Manifest {
    debug!("registry"; "manifest: {}", source.source.path());
    match &source.source {
        Source::Missing { path } => Manifest::missing(path),
        Source::Unreadable { path } => Manifest::failed(path),
        Source::Read { path, text } => parse_manifest(path, text).unwrap_or_else(|finding| {
            findings.push(finding);
            Manifest::failed(path)
        }),
    }
}

fn load_registry(
    source: &RegistrySource,
    term_prefixes: &[String],
    findings: &mut Vec<Finding>,
) -> Registry {
    match &source.source {
        Source::Missing { .. } => Registry::missing(source.kind),
        Source::Unreadable { path } => Registry::failed(source.kind, path),
        Source::Read { path, text } => {
            let (registry, registry_findings) =
                parse_registry(source.kind, path, text, term_prefixes);
            debug!(
                "registry";
                "{} from {}: {}{}",
                registry.kind,
                registry.source.as_deref().unwrap_or(path),
                plural_count(registry.len(), "record"),
                registry
                    .generated_at
                    .as_deref()
                    .map(|at| format!(", generated {at}"))
                    .unwrap_or_default()
            );
            findings.extend(registry_findings);
            registry
        }
    }
}

fn load_sitemap(source: &Source, findings: &mut Vec<Finding>) -> Sitemap {
    match source {
        Source::Missing { path } => Sitemap::missing(path),
        Source::Unreadable { path } => Sitemap::failed(path),
        Source::Read { path, text } => parse_sitemap(path, text).unwrap_or_else(|finding| {
            findings.push(finding);
            Sitemap::failed(path)
        }),
    }
}
