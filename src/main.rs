use boolsat::*;
use clap::{value_t, App, Arg};
use std::io::{self, BufRead, Write};

fn main() {
    env_logger::init();

    let matches = App::new("boolsat")
        .about("Decides satisfiability of a propositional formula by exhaustive search")
        .arg(
            Arg::with_name("INPUT")
                .help("file holding the formula (reads one line from stdin if omitted)")
                .index(1),
        )
        .arg(
            Arg::with_name("print-tree")
                .long("print-tree")
                .help("print the formula tree that gets lowered"),
        )
        .arg(
            Arg::with_name("print-ops")
                .long("print-ops")
                .help("print the lowered program"),
        )
        .arg(
            Arg::with_name("no-optimize")
                .long("no-optimize")
                .help("lower the formula as parsed"),
        )
        .arg(
            Arg::with_name("parallel")
                .short("p")
                .long("parallel")
                .help("search assignments on all cores"),
        )
        .arg(
            Arg::with_name("max-vars")
                .long("max-vars")
                .value_name("N")
                .takes_value(true)
                .help("refuse formulas with more than N free variables"),
        )
        .get_matches();

    let options = Options {
        optimize: !matches.is_present("no-optimize"),
        parallel: matches.is_present("parallel"),
        max_variables: if matches.is_present("max-vars") {
            Some(value_t!(matches, "max-vars", usize).unwrap_or_else(|e| e.exit()))
        } else {
            None
        },
    };

    let input = match matches.value_of("INPUT") {
        Some(path) => std::fs::read_to_string(path),
        None => read_line(),
    };

    match input.map_err(Error::from).and_then(|text| compile(&text, &options)) {
        Ok(compiled) => {
            if matches.is_present("print-tree") {
                println!("{:#}", compiled.expr);
            }
            if matches.is_present("print-ops") {
                for op in &compiled.program {
                    println!("{}", op);
                }
            }

            let mut solver = Solver::new(&compiled.program, compiled.environment).parallel(options.parallel);
            let exit_code = match solver.solve() {
                SatResult::Satisfiable(model) => {
                    println!("Given expression is satisfiable with these values:");
                    for (name, value) in model.free_variables() {
                        println!("{} = {}", name, value);
                    }
                    0
                }
                SatResult::Unsatisfiable => {
                    println!("Given expression is unsatisfiable.");
                    1
                }
            };
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(-1);
        }
    }
}

fn read_line() -> io::Result<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
