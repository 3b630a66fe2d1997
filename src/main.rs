use std::fs;
use std::io::{stdin, stdout};
use std::process;

use clap::Parser as ClapParser;
use waffle::ast::Node;
use waffle::compiler::{Compiler, CompilerOptions};
use waffle::evaluator::Evaluator;
use waffle::lexer::Lexer;
use waffle::parser::Parser;
use waffle::repl;
use waffle::vm::VM;

/// The waffle programming language.
#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to run; starts an interactive session when omitted.
    file: Option<String>,

    /// Use the bytecode compiler and VM instead of the tree-walking evaluator.
    #[arg(short, long)]
    bytecode: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    match args.file {
        Some(path) => {
            let source = fs::read_to_string(&path).unwrap_or_else(|_| {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?", &path);
                process::exit(1);
            });
            run_source(&source, args.bytecode);
            Ok(())
        },
        None => {
            if args.bytecode {
                repl::start_compiled(stdin(), stdout())
            } else {
                repl::start(stdin(), stdout())
            }
        }
    }
}

fn run_source(source: &str, bytecode: bool) {
    let l = Lexer::new(source);
    let mut p = Parser::new(l);
    let program = p.parse_program();
    if !p.errors().is_empty() {
        eprintln!("parser errors:");
        for msg in p.errors() {
            eprintln!("    {}", msg);
        }
        process::exit(1);
    }

    if bytecode {
        let mut comp = Compiler::new().with_options(CompilerOptions{ compile_loops: true });
        if let Err(msg) = comp.compile(Node::Program(program)) {
            eprintln!("compile error occurred: {}", msg);
            process::exit(1);
        }

        let mut machine = VM::new(comp.byte_code());
        if let Err(err) = machine.run() {
            eprintln!("runtime error occurred: {}", err);
            process::exit(1);
        }
        println!("{}", machine.last_popped_stack_elem());
    } else {
        let mut eval = Evaluator::new();
        match eval.eval(Node::Program(program)) {
            None => {
                eprintln!("returned object is None");
                process::exit(1);
            },
            Some(obj) => println!("{}", obj),
        }
    }
}
