use anyhow::{Context, Result};
use tracing::{info, warn};

use rubric_concepts::{
    ConceptMapping, ConceptMappingStore, mapping_worklist, merge_updates, unmapped_rubric_items,
};
use rubric_ingest::read_csv_table;
use rubric_map::{MappingHintStore, normalize_table, suggest_mapping};
use rubric_model::{AnalysisOptions, MappingConfig, RawTable};
use rubric_validate::{validate, validate_canonical};

use rubric_cli::pipeline::{
    AnalysisInput, parse_concept_pairs, resolve_mapping, run_analysis, write_exports,
};
use rubric_cli::types::{AnalysisReport, ExportSummary, ValidateOutcome};

use crate::cli::{AnalyzeArgs, ConceptsAction, ConceptsArgs, MappingArgs, SuggestArgs, ValidateArgs};
use crate::summary::{print_concepts, print_suggestion, print_worklist};

/// Mapping selected by the flags, plus the hint store when one is configured.
fn select_mapping(
    args: &MappingArgs,
    table: &RawTable,
) -> Result<(Option<MappingConfig>, Option<MappingHintStore>)> {
    let hint = args.mapping_hint.as_ref().map(MappingHintStore::new);
    let mapping = resolve_mapping(args.mapping.as_deref(), &args.map, hint.as_ref(), table)?;
    Ok((mapping, hint))
}

fn remember_mapping(hint: Option<&MappingHintStore>, used: Option<&MappingConfig>) -> Result<()> {
    if let (Some(store), Some(mapping)) = (hint, used) {
        store.save(mapping)?;
        info!(path = %store.path().display(), "Saved mapping hint");
    }
    Ok(())
}

pub fn run_suggest(args: &SuggestArgs) -> Result<()> {
    let table = read_csv_table(&args.csv)?;
    let suggestion = suggest_mapping(&table);
    print_suggestion(&table, &suggestion);
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateOutcome> {
    let table = read_csv_table(&args.csv)?;
    let raw = validate(&table);
    let (mapping, hint) = select_mapping(&args.mapping, &table)?;
    match normalize_table(&table, mapping.as_ref(), !args.mapping.no_infer) {
        Ok(normalized) => {
            remember_mapping(hint.as_ref(), normalized.mapping_used.as_ref())?;
            Ok(ValidateOutcome {
                raw,
                normalized: Some(validate_canonical(&normalized.table)),
                normalize_error: None,
            })
        }
        Err(error) => {
            warn!(%error, "Normalization failed");
            Ok(ValidateOutcome {
                raw,
                normalized: None,
                normalize_error: Some(error.to_string()),
            })
        }
    }
}

fn analysis_options(args: &AnalyzeArgs) -> AnalysisOptions {
    let options = AnalysisOptions {
        distribution_bins: args.bins,
        ..AnalysisOptions::default()
    }
    .with_exam_order(args.exam_order.iter().map(|exam| exam.trim()))
    .with_top_n(args.top_n)
    .with_include_unmapped(args.include_unmapped);
    if args.allow_concept.is_empty() {
        options
    } else {
        options.with_allowed_concepts(args.allow_concept.iter().map(String::as_str))
    }
}

fn load_concepts(args: &AnalyzeArgs) -> Result<ConceptMapping> {
    match &args.concepts {
        Some(path) => Ok(ConceptMappingStore::new(path).load()?),
        None => Ok(ConceptMapping::new()),
    }
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<(AnalysisReport, Option<ExportSummary>)> {
    let table = read_csv_table(&args.csv)?;
    let (mapping, hint) = select_mapping(&args.mapping, &table)?;
    let concepts = load_concepts(args)?;
    let options = analysis_options(args);

    let report = run_analysis(&AnalysisInput {
        table: &table,
        mapping: mapping.as_ref(),
        infer: !args.mapping.no_infer,
        concepts: &concepts,
        options: &options,
        students: &args.student,
        anonymize: args.anonymize,
    })?;
    remember_mapping(hint.as_ref(), report.mapping_used.as_ref())?;

    let exports = match &args.output_dir {
        Some(dir) => Some(write_exports(&report, dir)?),
        None => None,
    };
    Ok((report, exports))
}

pub fn run_concepts(args: &ConceptsArgs) -> Result<()> {
    let store = ConceptMappingStore::new(&args.file);
    match &args.action {
        ConceptsAction::List => {
            let mapping = store.load()?;
            print_concepts(&mapping);
        }
        ConceptsAction::Set { pairs } => {
            let existing = store.load()?;
            let updates = parse_concept_pairs(pairs)?;
            let merged = merge_updates(&existing, &updates);
            let saved = store
                .save(&merged)
                .with_context(|| format!("Failed to save {}", store.path().display()))?;
            println!("Saved {} mappings to {}", saved.len(), store.path().display());
        }
        ConceptsAction::Unmapped {
            csv,
            all,
            filter,
            mapping,
        } => {
            let table = read_csv_table(csv)?;
            let (selected, _) = select_mapping(mapping, &table)?;
            let normalized = normalize_table(&table, selected.as_ref(), !mapping.no_infer)?;
            let concepts = store.load()?;
            let mut worklist = mapping_worklist(&normalized.table, &concepts, filter);
            if !*all {
                let unmapped = unmapped_rubric_items(&normalized.table, &concepts);
                worklist.retain(|entry| unmapped.contains(&entry.rubric_item));
            }
            print_worklist(&worklist);
        }
    }
    Ok(())
}
