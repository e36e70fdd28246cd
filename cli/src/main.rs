mod args;

use crate::args::Args;
use color_eyre::Result;
use lifesep_lib::{
    from_rle, to_rle, Grid, ObjectSeparator, PeriodFinder, SeparatedObject, SeparationRule,
    SeparationStatus, TransitionTable,
};
use rand::{thread_rng, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::io::{read_to_string, stdin};

/// One separated object, as printed in JSON.
#[derive(Debug, Serialize)]
struct ObjectReport {
    prefix: Option<String>,
    x: i64,
    y: i64,
    period: Option<usize>,
    displacement: Option<(i64, i64)>,
    rle: String,
}

impl ObjectReport {
    fn new(object: &SeparatedObject, table: &TransitionTable) -> Self {
        let (x, y) = object.pattern.offset();
        Self {
            prefix: object.classification.prefix(),
            x,
            y,
            period: object.classification.period,
            displacement: object.classification.displacement,
            rle: to_rle(&object.pattern, Some(table)),
        }
    }
}

/// The whole result, as printed in JSON.
#[derive(Debug, Serialize)]
struct Report {
    rule: String,
    generation: u64,
    status: SeparationStatus,
    objects: Vec<ObjectReport>,
}

/// Read the pattern from the input file or stdin, or generate a random soup.
fn load(args: &Args) -> Result<Grid> {
    if let Some(size) = args.soup {
        let seed = args.seed.unwrap_or_else(|| thread_rng().gen());
        log::info!("Generating a {size}x{size} soup with seed {seed}");
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        return Ok(Grid::random(size, size, args.density, &mut rng));
    }

    let rle = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => read_to_string(stdin())?,
    };
    Ok(from_rle(&rle)?)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse_and_validate();

    let table = TransitionTable::from_transitions(&args.birth, &args.survival)?;
    let rule = SeparationRule::new(table)?;

    let mut grid = load(&args)?;
    grid.run(rule.table(), args.run);
    log::info!(
        "Separating a pattern of {} cells under {}",
        grid.population(),
        rule.table()
    );

    let mut separator = ObjectSeparator::new(grid, &rule);
    let separation = separator.separate(&PeriodFinder, &args.config);
    log::info!(
        "Found {} objects at generation {}",
        separation.objects.len(),
        separator.generation()
    );

    if args.json {
        let report = Report {
            rule: rule.table().to_string(),
            generation: separator.generation(),
            status: separation.status,
            objects: separation
                .objects
                .iter()
                .map(|object| ObjectReport::new(object, rule.table()))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !separation.is_complete() {
        println!("#C Partial separation");
    }
    for object in &separation.objects {
        let (x, y) = object.pattern.offset();
        let prefix = object.classification.prefix();
        println!("#C {} at ({x}, {y})", prefix.as_deref().unwrap_or("unknown"));
        print!("{}", to_rle(&object.pattern, Some(rule.table())));
    }

    Ok(())
}
