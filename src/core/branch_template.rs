// src/core/branch_template.rs

//! Branch-mode script: a short main section that lists one subfunction per pipe
//! segment and hands them to `CTAP_pipeline_brancher`, followed by the
//! subfunctions themselves.

use crate::{
    core::{
        hierarchy::{resolve_hierarchy, SegmentLineage},
        renderer::{
            eeg_lines, hydra_lines, matlab_str, measurement_line, path_lines, step_set_block,
            RenderError,
        },
    },
    models::{BasicInfo, PipeSegment, RuntimeOptions},
};

const INDENT: &str = "   ";

pub fn render_branch(
    basic: &BasicInfo,
    runtime: &RuntimeOptions,
    segments: &[PipeSegment],
    stem: &str,
) -> Result<Vec<String>, RenderError> {
    let lineages = resolve_hierarchy(segments)?;

    let mut lines = vec![
        format!("PREPRO = {};", runtime.prepro),
        format!("STOP_ON_ERROR = {};", runtime.stop_on_error),
        format!("OVERWRITE_OLD_RESULTS = {};", runtime.overwrite_old_results),
    ];
    lines.extend(path_lines(basic, stem));
    lines.push("[Cfg, ~] = sbf_cfg(project_dir, pipeline_name);".to_string());
    lines.push("Cfg.grfx.on = false;".to_string());
    lines.push(measurement_line(basic));
    lines.extend(hydra_lines(basic));
    lines.push("clear Pipe;".to_string());

    let handles = lineages
        .iter()
        .map(|l| format!("@sbf_{}", l.id))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("pipeArr = {{{handles}}};"));
    lines.push("runps = 1:length(pipeArr);".to_string());
    lines.push("if PREPRO".to_string());
    lines.push(format!(
        "{INDENT}CTAP_pipeline_brancher(Cfg, pipeArr, 'runPipes', runps, 'dbg', STOP_ON_ERROR, 'ovw', OVERWRITE_OLD_RESULTS);"
    ));
    lines.push("end".to_string());

    lines.push("%% Subfunctions".to_string());
    lines.extend(config_subfunction(basic));

    for (segment, lineage) in segments.iter().zip(&lineages) {
        lines.extend(segment_subfunction(segment, lineage));
    }
    Ok(lines)
}

/// `sbf_cfg`: the shared configuration every segment starts from.
fn config_subfunction(basic: &BasicInfo) -> Vec<String> {
    let mut lines = vec![
        "function [Cfg, out] = sbf_cfg(project_root_folder, ID)".to_string(),
        format!("{INDENT}Cfg.id = ID;"),
        format!("{INDENT}Cfg.srcid = {{''}};"),
        format!("{INDENT}Cfg.env.paths.projectRoot = project_root_folder;"),
        format!("{INDENT}Cfg.env.paths.branchSource = '';"),
        format!("{INDENT}Cfg.env.paths.ctapRoot = fullfile(Cfg.env.paths.projectRoot, Cfg.id);"),
        format!("{INDENT}Cfg.env.paths.analysisRoot = Cfg.env.paths.ctapRoot;"),
    ];
    lines.extend(eeg_lines(basic, INDENT));
    lines.push(format!("{INDENT}out = struct([]);"));
    lines.push("end".to_string());
    lines
}

fn segment_subfunction(segment: &PipeSegment, lineage: &SegmentLineage) -> Vec<String> {
    let mut lines = vec![
        format!("function [Cfg, out] = sbf_{}(Cfg)", lineage.id),
        format!("{INDENT}%%%%%%%% Define hierarchy %%%%%%%%"),
        format!("{INDENT}Cfg.id = {};", matlab_str(&lineage.id)),
        format!("{INDENT}Cfg.srcid = {{{}}};", matlab_str(&lineage.srcid)),
        format!("{INDENT}%%%%%%%% Define pipeline %%%%%%%%"),
    ];
    lines.extend(step_set_block(&segment.step_sets, INDENT));
    lines.push(format!("{INDENT}Cfg.pipe.runSets = {{stepSet(:).id}};"));
    lines.push(format!("{INDENT}Cfg.pipe.stepSets = stepSet;"));
    lines.push("end".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::HierarchyError;
    use crate::models::{FunctionCall, HydraSettings, StepSet};

    fn basic() -> BasicInfo {
        BasicInfo {
            pipeline_name: "branchy".to_string(),
            project_root: "proj".to_string(),
            sbj_filt: "all".to_string(),
            eeg_type: "set".to_string(),
            eeg_chanloc: "chanlocs128_pist.elp".to_string(),
            eeg_reference: "average".to_string(),
            eeg_veog_channel_names: "VEOG".to_string(),
            eeg_heog_channel_names: "HEOG".to_string(),
            hydra: HydraSettings { enabled: false, source: None },
            ..Default::default()
        }
    }

    fn two_segments() -> Vec<PipeSegment> {
        vec![
            PipeSegment::new(
                "A",
                "_filter",
                "",
                vec![StepSet::new(
                    "_load",
                    vec![
                        FunctionCall::new("CTAP_load_data", ""),
                        FunctionCall::new("CTAP_fir_filter", "'locutoff', 1"),
                    ],
                )],
            ),
            PipeSegment::new(
                "B",
                "_ica",
                "A",
                vec![StepSet::new("_ica", vec![FunctionCall::new("CTAP_run_ica", "")])],
            ),
        ]
    }

    #[test]
    fn test_main_section_lists_segments_in_order() {
        let lines =
            render_branch(&basic(), &RuntimeOptions::default(), &two_segments(), "branchy").unwrap();
        assert_eq!(lines[0], "PREPRO = true;");
        assert!(lines.contains(&"pipeArr = {@sbf_A, @sbf_B};".to_string()));
        assert!(lines.contains(&"runps = 1:length(pipeArr);".to_string()));
        let brancher = lines.iter().position(|l| l.contains("CTAP_pipeline_brancher")).unwrap();
        assert_eq!(lines[brancher - 1], "if PREPRO");
        assert_eq!(lines[brancher + 1], "end");
    }

    #[test]
    fn test_segment_subfunctions_carry_hierarchy() {
        let lines =
            render_branch(&basic(), &RuntimeOptions::default(), &two_segments(), "branchy").unwrap();
        let defs: Vec<&String> = lines.iter().filter(|l| l.starts_with("function ")).collect();
        assert_eq!(
            defs,
            vec![
                "function [Cfg, out] = sbf_cfg(project_root_folder, ID)",
                "function [Cfg, out] = sbf_A(Cfg)",
                "function [Cfg, out] = sbf_B(Cfg)",
            ]
        );
        assert!(lines.contains(&"   Cfg.srcid = {''};".to_string()));
        assert!(lines.contains(&"   Cfg.srcid = {'A#1_filter'};".to_string()));
        assert!(lines.contains(&"   Cfg.id = 'B';".to_string()));
    }

    #[test]
    fn test_step_set_numbering_restarts_per_segment() {
        let lines =
            render_branch(&basic(), &RuntimeOptions::default(), &two_segments(), "branchy").unwrap();
        let first_ids: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with("   stepSet(1).id"))
            .collect();
        assert_eq!(first_ids.len(), 2);
        assert!(!lines.iter().any(|l| l.contains("stepSet(2)")));
        assert!(lines.contains(&"   out.fir_filter = struct('locutoff', 1);".to_string()));
    }

    #[test]
    fn test_config_subfunction_indents_eeg_lines() {
        let lines =
            render_branch(&basic(), &RuntimeOptions::default(), &two_segments(), "branchy").unwrap();
        assert!(lines.contains(&"   Cfg.eeg.chanlocs = 'chanlocs128_pist.elp';".to_string()));
        assert!(lines.contains(&"   Cfg.eeg.reference = {'average'};".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Cfg.eeg.")));
    }

    #[test]
    fn test_second_segment_referencing_pipe1() {
        let segments = vec![
            PipeSegment::new("pipe1", "_load", "", vec![StepSet::new("_load", vec![FunctionCall::new("CTAP_load_data", "")])]),
            PipeSegment::new("pipe2", "_ica", "pipe1", vec![StepSet::new("_ica", vec![FunctionCall::new("CTAP_run_ica", "")])]),
        ];
        let lines = render_branch(&basic(), &RuntimeOptions::default(), &segments, "branchy").unwrap();
        let routines = lines.iter().filter(|l| l.starts_with("function [Cfg, out] = sbf_pipe")).count();
        assert_eq!(routines, 2);
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("pipeArr")).collect::<Vec<_>>(),
            vec!["pipeArr = {@sbf_pipe1, @sbf_pipe2};"]
        );
        assert!(lines.contains(&"   Cfg.srcid = {'pipe1#1_load'};".to_string()));
    }

    #[test]
    fn test_unknown_parent_blocks_rendering() {
        let mut segments = two_segments();
        segments[1].parent = "Z".to_string();
        let err = render_branch(&basic(), &RuntimeOptions::default(), &segments, "branchy")
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::Hierarchy(HierarchyError::UnknownParent {
                id: "B".to_string(),
                parent: "Z".to_string(),
            })
        );
    }

    #[test]
    fn test_each_segment_ends_with_pipe_assignment() {
        let lines =
            render_branch(&basic(), &RuntimeOptions::default(), &two_segments(), "branchy").unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("end"));
        let n = lines.len();
        assert_eq!(lines[n - 3], "   Cfg.pipe.runSets = {stepSet(:).id};");
        assert_eq!(lines[n - 2], "   Cfg.pipe.stepSets = stepSet;");
    }
}
