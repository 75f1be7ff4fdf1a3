// src/core/linear_template.rs

use crate::{
    core::renderer::{eeg_lines, hydra_lines, measurement_line, path_lines, step_set_block},
    models::{BasicInfo, RuntimeOptions, StepSet},
};

/// Renders a linear pipeline: one script that builds every stepSet and hands
/// them to `CTAP_pipeline_looper`.
pub fn render_linear(
    basic: &BasicInfo,
    runtime: &RuntimeOptions,
    step_sets: &[StepSet],
    stem: &str,
) -> Vec<String> {
    let mut lines = vec![
        format!("STOP_ON_ERROR = {};", runtime.stop_on_error),
        format!("OVERWRITE_OLD_RESULTS = {};", runtime.overwrite_old_results),
    ];

    lines.extend(path_lines(basic, stem));
    lines.push("Cfg.env.paths = cfg_create_paths(project_dir, pipeline_name, {''}, 1);".to_string());
    lines.extend(eeg_lines(basic, ""));
    lines.push("Cfg.grfx.on = false;".to_string());
    lines.push(measurement_line(basic));
    lines.extend(hydra_lines(basic));

    lines.push("clear Pipe;".to_string());
    lines.extend(step_set_block(step_sets, ""));

    lines.extend([
        "Cfg.pipe.stepSets = stepSet;".to_string(),
        "Cfg.pipe.runSets = {stepSet(:).id};".to_string(),
        "Cfg = ctap_auto_config(Cfg, out);".to_string(),
        "%% Run the pipe".to_string(),
        "CTAP_pipeline_looper(Cfg, 'debug', STOP_ON_ERROR, 'overwrite', OVERWRITE_OLD_RESULTS);"
            .to_string(),
        "clear i stepSet Filt ctap_args".to_string(),
    ]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FunctionCall, HydraSettings};

    fn demo_basic() -> BasicInfo {
        BasicInfo {
            pipeline_name: "demo".to_string(),
            project_root: "demo_project".to_string(),
            sbj_filt: "1".to_string(),
            eeg_type: "set".to_string(),
            eeg_chanloc: "chanlocs128_pist.elp".to_string(),
            eeg_reference: "L_MASTOID, R_MASTOID".to_string(),
            eeg_veog_channel_names: "VEOG1, VEOG2".to_string(),
            eeg_heog_channel_names: "HEOG1, HEOG2".to_string(),
            hydra: HydraSettings { enabled: false, source: None },
            ..Default::default()
        }
    }

    fn demo_step_sets() -> Vec<StepSet> {
        vec![
            StepSet::new("_load", vec![FunctionCall::new("CTAP_load_data", "")]),
            StepSet::new(
                "_artifact_correction",
                vec![
                    FunctionCall::new("CTAP_fir_filter", "'locutoff', 1"),
                    FunctionCall::new("CTAP_run_ica", "'method', 'fastica'"),
                    FunctionCall::new("CTAP_detect_bad_comps", "'method', 'blink_template'"),
                ],
            ),
        ]
    }

    #[test]
    fn test_round_trip_scenario() {
        let step_sets = vec![StepSet::new("_load", vec![FunctionCall::new("CTAP_load_data", "")])];
        let lines = render_linear(&demo_basic(), &RuntimeOptions::default(), &step_sets, "demo");

        assert!(lines.contains(&"pipeline_name = 'demo';".to_string()));
        assert!(lines.iter().any(|l| l.contains("stepSet(1).id = [num2str(1), '_load']")));
        assert!(lines.iter().any(|l| l.contains("@CTAP_load_data")));
        assert!(lines.contains(&"out.load_data = struct();".to_string()));
    }

    #[test]
    fn test_full_document_order() {
        let lines = render_linear(
            &demo_basic(),
            &RuntimeOptions::default(),
            &demo_step_sets(),
            "demo",
        );
        let expected = vec![
            "STOP_ON_ERROR = false;",
            "OVERWRITE_OLD_RESULTS = true;",
            "pipeline_name = 'demo';",
            "FILE_ROOT = mfilename('fullpath');",
            "reporoot = FILE_ROOT(1:strfind(FILE_ROOT, fullfile('ctap', 'templates', 'demo_project', 'demo')) - 1);",
            "project_dir = FILE_ROOT(1:strfind(FILE_ROOT, fullfile('demo')) - 1);",
            "data_dir = append(reporoot, 'ctap/data/test_data');",
            "Cfg.env.paths = cfg_create_paths(project_dir, pipeline_name, {''}, 1);",
            "Cfg.eeg.chanlocs = 'chanlocs128_pist.elp';",
            "Cfg.eeg.reference = {'L_MASTOID', 'R_MASTOID'};",
            "Cfg.eeg.veogChannelNames = {'VEOG1', 'VEOG2'};",
            "Cfg.eeg.heogChannelNames = {'HEOG1', 'HEOG2'};",
            "Cfg.grfx.on = false;",
            "Cfg.MC = get_meas_cfg_MC(Cfg, data_dir, 'eeg_ext', 'set', 'sbj_filt', 1);",
            "clear Pipe;",
            "stepSet(1).id = [num2str(1), '_load'];",
            "stepSet(1).funH = {@CTAP_load_data};",
            "stepSet(2).id = [num2str(2), '_artifact_correction'];",
            "stepSet(2).funH = {@CTAP_fir_filter, @CTAP_run_ica, @CTAP_detect_bad_comps};",
            "out.load_data = struct();",
            "out.fir_filter = struct('locutoff', 1);",
            "out.run_ica = struct('method', 'fastica');",
            "out.detect_bad_comps = struct('method', 'blink_template');",
            "Cfg.pipe.stepSets = stepSet;",
            "Cfg.pipe.runSets = {stepSet(:).id};",
            "Cfg = ctap_auto_config(Cfg, out);",
            "%% Run the pipe",
            "CTAP_pipeline_looper(Cfg, 'debug', STOP_ON_ERROR, 'overwrite', OVERWRITE_OLD_RESULTS);",
            "clear i stepSet Filt ctap_args",
        ];
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let basic = demo_basic();
        let runtime = RuntimeOptions::default();
        let step_sets = demo_step_sets();
        let first = render_linear(&basic, &runtime, &step_sets, "demo").join("\n");
        let second = render_linear(&basic, &runtime, &step_sets, "demo").join("\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_reordering_functions_only_touches_their_lines() {
        let basic = demo_basic();
        let runtime = RuntimeOptions::default();
        let original = demo_step_sets();
        let mut reordered = original.clone();
        reordered[1].functions.swap(0, 2);

        let before = render_linear(&basic, &runtime, &original, "demo");
        let after = render_linear(&basic, &runtime, &reordered, "demo");
        assert_eq!(before.len(), after.len());

        let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
        let handle_line = before
            .iter()
            .position(|l| l.starts_with("stepSet(2).funH"))
            .unwrap();
        let fir = before.iter().position(|l| l.starts_with("out.fir_filter")).unwrap();
        let bad_comps = before
            .iter()
            .position(|l| l.starts_with("out.detect_bad_comps"))
            .unwrap();
        assert_eq!(changed, vec![handle_line, fir, bad_comps]);
        assert_eq!(
            after[handle_line],
            "stepSet(2).funH = {@CTAP_detect_bad_comps, @CTAP_run_ica, @CTAP_fir_filter};"
        );
        assert_eq!(after[fir], "out.detect_bad_comps = struct('method', 'blink_template');");
    }

    #[test]
    fn test_line_budget_per_step_set() {
        let basic = demo_basic();
        let runtime = RuntimeOptions::default();
        let empty = render_linear(&basic, &runtime, &[], "demo").len();
        let full = render_linear(&basic, &runtime, &demo_step_sets(), "demo").len();
        // 2 stepSets * 2 structural lines + 4 functions
        assert_eq!(full - empty, 8);
    }

    #[test]
    fn test_hydra_block_sits_before_clear_pipe() {
        let mut basic = demo_basic();
        basic.hydra = HydraSettings::default();
        let lines = render_linear(&basic, &RuntimeOptions::default(), &demo_step_sets(), "demo");
        let hydra = lines.iter().position(|l| l == "HYDRA = true;").unwrap();
        let mc = lines.iter().position(|l| l.starts_with("Cfg.MC")).unwrap();
        let clear = lines.iter().position(|l| l == "clear Pipe;").unwrap();
        assert!(mc < hydra && hydra < clear);
    }
}
