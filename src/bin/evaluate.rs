use aspset_eval::cli::{EvalCli, summary_line};
use aspset_eval::data_loader::EvaluationDataLoader;
use aspset_eval::dataset::Aspset510;
use aspset_eval::evaluation::Joints3dEvaluator;
use aspset_eval::io::write_results_report;
use aspset_eval::mocap::MocapFormats;
use aspset_eval::skeleton::SkeletonRegistry;
use aspset_eval::types::EvaluationPair;
use clap::Parser;
use indicatif::ProgressBar;

fn accumulate(
    evaluator: &mut Joints3dEvaluator,
    pair: &EvaluationPair,
) -> aspset_eval::Result<usize> {
    for prediction in pair.predictions.values() {
        evaluator.add_batch(&prediction.poses, &pair.ground_truth.poses)?;
    }
    Ok(pair.predictions.len())
}

fn run(cli: &EvalCli) -> aspset_eval::Result<()> {
    let config = cli.evaluation_config()?;
    log::debug!("{:?}", config);
    let dataset = Aspset510::open(&cli.data_dir)?;
    let skeletons = SkeletonRegistry::builtin();
    let formats = MocapFormats::with_defaults();
    let eval_data =
        EvaluationDataLoader::new(&dataset, &skeletons, &formats, &cli.predictions, &config)?;
    let mut evaluator = Joints3dEvaluator::new(eval_data.skeleton().clone());
    let mut n_prediction_files = 0;

    if cli.parallel {
        for pair in &eval_data.load_all_parallel()? {
            n_prediction_files += accumulate(&mut evaluator, pair)?;
        }
    } else {
        let progress = ProgressBar::new(eval_data.len() as u64);
        for pair in &eval_data {
            n_prediction_files += accumulate(&mut evaluator, &pair?)?;
            progress.inc(1);
        }
        progress.finish();
    }

    let results = evaluator.collect_results_with_threshold(config.pck_threshold);
    println!("{}\n", summary_line(evaluator.len(), n_prediction_files));
    print!("{}", results);

    if let Some(report) = &cli.report {
        write_results_report(report, &config, evaluator.len(), n_prediction_files, &results)?;
        log::info!("wrote report to {}", report.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = EvalCli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
