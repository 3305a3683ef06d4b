use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use log::info;

use nice9::*;

fn main() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(msg) = configure_logging(level) {
            print_errs(&[msg]);
        }
    }

    let tracing = match get_codegen_tracing(&config) {
        Ok(tracing) => tracing,
        Err(msg) => {
            print_errs(&[msg]);
            return Err(ERR_ARGUMENT);
        }
    };

    let input = match config.value_of("input") {
        Some(input) => Path::new(input),
        None => {
            print_errs(&["Expected a program manifest to compile".into()]);
            return Err(ERR_ARGUMENT);
        }
    };

    let manifest = match read_manifest(input) {
        Ok(manifest) => manifest,
        Err(msg) => {
            print_errs(&[msg]);
            return Err(ERR_MANIFEST);
        }
    };

    let build_time = Instant::now();
    let (symbols, program) = match manifest.build() {
        Ok(built) => built,
        Err(msg) => {
            print_errs(&[format!("Semantic error: {}", msg)]);
            return Err(ERR_SEMANTIC);
        }
    };
    info!("AST: {}", build_time.elapsed().as_secs_f32());

    if emit_ast(&config) {
        println!("{}", program);
        return Ok(());
    }

    let codegen_time = Instant::now();
    let asm = match compile_with_tracing(&program, &symbols, tracing) {
        Ok(asm) => asm,
        Err(err) => {
            print_errs(&[format!("Code generation failed: {}", err)]);
            return Err(ERR_CODEGEN);
        }
    };
    info!(
        "Code generation: {} ({} lines)",
        codegen_time.elapsed().as_secs_f32(),
        asm.len()
    );

    let written = match config.value_of("output") {
        Some(output) => File::create(output)
            .and_then(|mut f| asm.print(&mut f).and_then(|_| f.flush())),
        None => asm.print(&mut std::io::stdout()),
    };
    if let Err(e) = written {
        print_errs(&[format!("Failed to write the listing: {}", e)]);
        return Err(ERR_OUTPUT);
    }

    Ok(())
}
