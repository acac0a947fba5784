use sweep_service::{
    named_dependency, named_filter, DependencySet, FilterSet, MatrixSource, ParamMap, Scalar,
    SummaryFormat, SweepConfig, SweepRunner,
};

#[tokio::main]
async fn main() {
    let matrix = r#"
waves:
  H: [0.5, 2.0, 4]
  T: "8"
bathy:
  SLOPE: [0.02, 0.1, 3]
"#;

    // Derived values: deep-water wavelength and wave steepness.
    let dependencies = DependencySet::new()
        .with(named_dependency("wavelength", |v: &ParamMap| {
            let t = v["T"].as_f64().ok_or("T must be numeric")?;
            let mut out = ParamMap::new();
            out.insert(
                "L0".to_string(),
                Scalar::Float(9.81 * t * t / (2.0 * std::f64::consts::PI)),
            );
            Ok(out)
        }))
        .with(named_dependency("steepness", |v: &ParamMap| {
            let h = v["H"].as_f64().ok_or("H must be numeric")?;
            let l0 = v["L0"].as_f64().ok_or("L0 must be numeric")?;
            let mut out = ParamMap::new();
            out.insert("STEEPNESS".to_string(), Scalar::Float(h / l0));
            Ok(out)
        }));

    // Reject waves that would break before reaching the domain.
    let filters = FilterSet::new().with(named_filter("breaking_limit", |v: &ParamMap| {
        let steepness = v["STEEPNESS"].as_f64().unwrap_or(0.0);
        if steepness > 0.02 {
            let mut reason = ParamMap::new();
            reason.insert("REASON".to_string(), Scalar::from("wave too steep"));
            reason.insert("STEEPNESS".to_string(), Scalar::Float(steepness));
            Some(reason)
        } else {
            None
        }
    }));

    let config = SweepConfig::new("wave_demo")
        .with_procs(4)
        .with_output_dir("wave_demo_out")
        .with_summary_formats(vec![SummaryFormat::Csv, SummaryFormat::Json]);

    let runner = SweepRunner::new(config)
        .with_dependencies(dependencies)
        .with_filters(filters);

    let source = MatrixSource::NestedText(matrix.to_string());
    let outcome = runner.run(&source).await.expect("sweep failed");

    println!("combinations: {}", outcome.total_combinations);
    println!("trials:       {}", outcome.trials);
    println!("filtered out: {}", outcome.failures);
    for path in &outcome.written {
        println!("wrote {}", path.display());
    }
}
