use std::io::{BufRead, BufReader, Read, Write};
use std::string::String;
use crate::ast::Node;
use crate::compiler::{Compiler, CompilerOptions};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::symbol_table::SymbolTable;
use crate::vm::{GLOBALS_SIZE, VM};
use crate::object::Object;

const PROMPT: &str = ">> ";

const WAFFLE: &str =
r#"
                                  ad88    ad88 88
                                d8"     d8"   88
                                88      88    88
8b      db      d8 ,adPPYYba, MM88MMM MM88MMM 88  ,adPPYba,
 8b    d88b    d8' ""      Y8   88      88    88 a8P_____88
  8b  d8' 8b  d8'  ,adPPPPP88   88      88    88 8PP"""""""
   8bd8'   8bd8'   88,    ,88   88      88    88 "8b,   ,aa
    YP      YP      "8bbdP"Y8   88      88    88   "Ybbd8"'
"#;

// prompt loop over the tree-walking evaluator; bindings survive across lines
pub fn start<R: Read, W: Write>(reader: R, mut writer: W) -> std::io::Result<()> {
    let mut env = Evaluator::new();
    let mut reader = BufReader::new(reader);
    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let l = Lexer::new(&line);
        let mut p = Parser::new(l);
        let program = p.parse_program();
        if !p.errors().is_empty() {
            print_parser_errors(&mut writer, p.errors())?;
            continue;
        }

        let evaluated = env.eval(Node::Program(program));
        let out = match evaluated {
            None => "returned object is None".to_string(),
            Some(obj) => format!("{}", obj),
        };
        writer.write_all(out.as_ref())?;
        writer.write_all("\n".as_ref())?;
    }
}

// prompt loop over the compiler and VM; the symbol table, constants pool and
// globals thread through every line
pub fn start_compiled<R: Read, W: Write>(reader: R, mut writer: W) -> std::io::Result<()> {
    let mut symbol_table = SymbolTable::new();
    let mut constants: Vec<Object> = Vec::new();
    let mut globals = vec![Object::Null; GLOBALS_SIZE];

    let mut reader = BufReader::new(reader);
    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let l = Lexer::new(&line);
        let mut p = Parser::new(l);
        let program = p.parse_program();
        if !p.errors().is_empty() {
            print_parser_errors(&mut writer, p.errors())?;
            continue;
        }

        let mut comp = Compiler::new_with_state(symbol_table.clone(), constants.clone())
            .with_options(CompilerOptions{ compile_loops: true });
        if let Err(msg) = comp.compile(Node::Program(program)) {
            writer.write_all(format!("compile error occurred: {}\n", msg).as_ref())?;
            continue;
        }

        symbol_table = comp.symbol_table().clone();
        let code = comp.byte_code();
        constants = code.constants.clone();

        let mut machine = VM::new_with_global_store(code, globals);
        let out = match machine.run() {
            Err(err) => format!("runtime error occurred: {}", err),
            Ok(_) => format!("{}", machine.last_popped_stack_elem()),
        };
        globals = machine.into_globals();

        writer.write_all(out.as_ref())?;
        writer.write_all("\n".as_ref())?;
    }
}

fn print_parser_errors<W: Write>(mut writer: W, errs: Vec<String>) -> std::io::Result<()> {
    write!(writer, "{}", WAFFLE)?;
    write!(writer, "Woops! We ran into some sticky business here!\n parser errors:\n")?;
    for msg in errs {
        write!(writer, "    {}\n", msg)?;
    }
    writer.flush()
}
