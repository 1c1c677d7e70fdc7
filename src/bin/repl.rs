use rpncalc::evaluator::Machine;
use rpncalc::parser::tokenize;
use rpncalc::Stack;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("RPN Calculator v0.1.0");
    println!("Enter tokens separated by spaces, or :help for commands.");
    println!();

    let mut rl = DefaultEditor::new().unwrap();
    let mut machine = Machine::new();
    let mut stack: Stack = Vec::new();

    loop {
        let prompt = if machine.is_recording() { "...> " } else { "rpn> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                // Add the line to history
                let _ = rl.add_history_entry(line);

                // Handle special commands
                match line {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":cmds" => {
                        print_commands(&machine);
                        continue;
                    }
                    ":clear" => {
                        stack.clear();
                        continue;
                    }
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                // Evaluate against a copy so a failed line leaves the
                // stack as it was.
                let ops = tokenize(line);
                match machine.evaluate(&ops, stack.clone()) {
                    Ok(next) => {
                        stack = next;
                        println!("[ {} ]", stack.join(" "));
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted. Use Ctrl+D or :quit to exit.");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
}

fn print_help() {
    println!("RPN Calculator Commands:");
    println!("  :help    - Show this help message");
    println!("  :cmds    - Show user-defined commands");
    println!("  :clear   - Clear the stack");
    println!("  :quit    - Exit the calculator");
    println!("  :exit    - Exit the calculator");
    println!();
    println!("Operators:");
    println!("  Constants:   pi, e");
    println!("  Arithmetic:  + - x / % ^ min max nroot gcd logn");
    println!("  Unary:       abs chs floor ceil inv round sgn sqrt !");
    println!("  Logarithms:  ln log log2 log10");
    println!("  Trig:        sin cos tan asin acos atan deg_rad rad_deg");
    println!("  Conversions: c_f f_c mi_km km_mi m_ft ft_m dec_hex dec_bin dec_oct");
    println!("  Stack:       cls drop dropn dup swap roll rolln rot rotn sum prod io to");
    println!("  Storage:     store   (e.g. `r 5 store`, then `r` recalls 5)");
    println!();
    println!("Examples:");
    println!("  3 4 +");
    println!("  ( double 2 x )      define `double`");
    println!("  ( _ dup x ) map     square every stack value");
    println!("  5 io sum            1+2+3+4+5");
}

fn print_commands(machine: &Machine) {
    let mut names = machine.user_command_names();
    if names.is_empty() {
        println!("No user commands defined.");
        return;
    }
    names.sort();
    for name in names {
        let body = machine.command_body(&name).unwrap_or(&[]).join(" ");
        println!("  {} = {}", name, body);
    }
}
