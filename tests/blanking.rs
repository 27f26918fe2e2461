use blankmill::black_book::BlackBook;
use blankmill::codegen::{Boundary, Command};
use blankmill::config::{self, JobConfig};
use blankmill::parser::parse_source;
use blankmill::tool_library::{default_tool_library, ToolLibrary};
use blankmill::{generate, PostProcessorType};
use pretty_assertions::assert_eq;

const SMALL: &str = r#"
part long 100 short 40 thickness 10
stock long 100 short 42
tool 1 dia 20
spindle rpm 3000
feed 300
depth 1
"#;

fn build(source: &str) -> JobConfig {
    let job = parse_source(source).expect("job should parse");
    config::build(&job, &BlackBook::new(), &default_tool_library()).expect("job should build")
}

#[test]
fn test_small_job_generic_program() {
    let (_, output) = generate(&build(SMALL), PostProcessorType::Generic).unwrap();

    let pause = |instruction: &'static str| {
        [
            "G53 G00 Z0.00",
            "M05",
            instruction,
            "M00",
            "M03 S3000",
            "G54",
        ]
    };

    let mut expected: Vec<&str> = vec![
        "%",
        "(BLANK 100.00 X 40.00 X 10.00)",
        "G21 G90 G17 G40 G49 G80",
        "G53 G00 X0.00 Y0.00 Z0.00",
        "G54",
        "(T1 FACE MILL D20.00)",
        "T1 M06",
        "M03 S3000",
        "G43 H1 Z52.00",
        // Long edge: 2 mm allowance, skim 0.2, passes at 1.2 and 2.0
        "(LONG EDGE - ALLOWANCE 2.00, 2 PASSES)",
        "(CLEAN-UP 0.20)",
        "G00 Z52.00",
        "G00 X-15.00 Y5.00",
        "M08",
        "G01 Z39.80 F150.00",
        "G01 X115.00 F150.00",
        "G00 Z52.00",
        "M09",
        "(CLAMP ORIENTATION 1)",
        "G00 Z52.00",
        "G00 X-15.00 Y5.00",
        "M08",
        "G01 Z38.80 F150.00",
        "G01 X115.00 F150.00",
        "G00 Z52.00",
        "M09",
    ];
    expected.extend(pause("(ROTATE PART 180 DEGREES)"));
    expected.extend([
        "G43 H1 Z52.00",
        "(CLAMP ORIENTATION 2)",
        "G00 Z52.00",
        "G00 X-15.00 Y5.00",
        "M08",
        "G01 Z38.00 F150.00",
        "G01 X115.00 F150.00",
        "G00 Z52.00",
        "M09",
    ]);
    expected.extend(pause("(RE-CLAMP PART FOR SHORT EDGE)"));
    expected.extend([
        // Short edge: no allowance, brackets only
        "G43 H1 Z110.00",
        "(SHORT EDGE - ALLOWANCE 0.00, 0 PASSES)",
        "(CLEAN-UP 0.00)",
        "G00 Z110.00",
        "G00 X-15.00 Y-5.00",
        "M08",
        "G00 Z110.00",
        "M09",
    ]);
    for (orientation, instruction) in [
        ("(CLAMP ORIENTATION 1)", "(ROTATE PART 180 DEGREES)"),
        ("(CLAMP ORIENTATION 2)", "(UNLOAD PART)"),
    ] {
        expected.extend([
            orientation,
            "G00 Z110.00",
            "G00 X-15.00 Y-5.00",
            "M08",
            "G00 Z110.00",
            "M09",
        ]);
        expected.extend(pause(instruction));
        expected.push("G43 H1 Z110.00");
    }
    expected.extend([
        "G00 Z110.00",
        "M09",
        "M05",
        "G00 X0.00 Y0.00",
        "M30",
        "%",
    ]);

    assert_eq!(output.lines, expected);
}

#[test]
fn test_mach3_numbers_machine_lines_only() {
    let (_, output) = generate(&build(SMALL), PostProcessorType::Mach3).unwrap();

    assert_eq!(output.lines[0], "%");
    assert_eq!(output.lines[1], "; blank 100.00 x 40.00 x 10.00");
    assert_eq!(output.lines[2], "N0010 G21 G90 G17 G40 G49 G80");
    assert_eq!(output.lines[4], "N0030 G92.1 G54");
    assert_eq!(output.lines.last().map(String::as_str), Some("%"));

    let numbered = output.lines.iter().filter(|l| l.starts_with('N')).count();
    let unnumbered = output
        .lines
        .iter()
        .filter(|l| l.starts_with(';') || l.as_str() == "%")
        .count();
    assert_eq!(numbered + unnumbered, output.lines.len());
    assert_eq!(
        output.lines.iter().rev().nth(1).map(String::as_str),
        Some(format!("N{:04} M30", numbered * 10).as_str())
    );
}

#[test]
fn test_every_dialect_frames_the_program() {
    let config = build(SMALL);
    for post in [
        PostProcessorType::Generic,
        PostProcessorType::Haas,
        PostProcessorType::LinuxCNC,
        PostProcessorType::Mach3,
    ] {
        let (program, first) = generate(&config, post).unwrap();
        let (_, second) = generate(&config, post).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.lines.len(), program.commands.len());
        assert_eq!(first.lines.first().map(String::as_str), Some("%"));
        assert_eq!(first.lines.last().map(String::as_str), Some("%"));
        assert_eq!(
            program.commands[program.commands.len() - 2],
            Command::ProgramBoundary(Boundary::End)
        );
    }
}

#[test]
fn test_demo_job_uses_material_table() {
    let config = build(include_str!("../demos/plate.blank"));

    // 6061 at 500 m/min on the 50 mm library cutter
    assert_eq!(config.tool.diameter, 50.0);
    assert_eq!(config.cutting.spindle_speed, 3183.0);
    assert!((config.cutting.feed_rate - 3183.0 * 0.14 * 6.0).abs() < 1e-6);

    let (program, output) = generate(&config, PostProcessorType::Haas).unwrap();
    assert!(output.lines.contains(&"M03 S3183".to_string()));
    assert_eq!(program.commands.iter().filter(|c| **c == Command::Pause).count(), 4);
}

#[test]
fn test_json_record_matches_job_file() {
    let json: JobConfig = JobConfig::from_json(include_str!("../demos/plate.json")).unwrap();
    assert!(json.debug);

    let (program, _) = generate(&json, PostProcessorType::Generic).unwrap();
    let summaries: Vec<String> = program.summaries.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        summaries,
        vec![
            "long edge: clean-up 0.50, remaining 4.50, 5 adjustment passes",
            "short edge: clean-up 0.30, remaining 2.70, 3 adjustment passes",
        ]
    );
}

#[test]
fn test_external_tool_library() {
    let tools = ToolLibrary::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/tools.json")).unwrap();
    let job = parse_source(
        "part long 150 short 50 thickness 20\nstock long 153 short 55\ntool 3 \"SHOP_63\"\ndepth 1.5\nmaterial \"Steel 1018\"\n",
    )
    .unwrap();
    let config = config::build(&job, &BlackBook::new(), &tools).unwrap();
    assert_eq!(config.tool.number, 3);
    assert_eq!(config.tool.diameter, 63.0);
    assert!(config.cutting.spindle_speed > 0.0 && config.cutting.spindle_speed <= 6000.0);
}

#[test]
fn test_invalid_depth_rejected() {
    let mut config = build(SMALL);
    config.cutting.depth_of_cut = 0.0;
    let err = generate(&config, PostProcessorType::Generic).unwrap_err();
    assert!(err.to_string().contains("cutting.depth_of_cut"));
}

#[test]
fn test_written_program_ends_with_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.nc");
    let (_, output) = generate(&build(SMALL), PostProcessorType::LinuxCNC).unwrap();
    std::fs::write(&path, format!("{}\n", output)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("%\n; blank"));
    assert!(text.ends_with("M30\n%\n"));
    assert!(text.contains("G28\n"));
}
