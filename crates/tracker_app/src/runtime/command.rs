use tracker_core::BatchParameters;

/// Operator commands accepted on stdin.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Submit(BatchParameters),
    Abandon,
    Pending,
    Dismiss,
    Quit,
}

/// Parses one input line. Range checks happen in the state machine, not
/// here; this only turns words into a command.
pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };

    match verb {
        "submit" => {
            let Some(size_word) = words.next() else {
                return Err("usage: submit <batch_size> [weight] [country]".to_string());
            };
            let batch_size: u32 = size_word
                .parse()
                .map_err(|_| format!("batch size {size_word:?} is not a number"))?;
            let mut params = BatchParameters::new(batch_size);
            if let Some(weight_word) = words.next() {
                let weight: f64 = weight_word
                    .parse()
                    .map_err(|_| format!("weight {weight_word:?} is not a number"))?;
                params.similarity_weight = Some(weight);
            }
            if let Some(country) = words.next() {
                params.country_code = Some(country.to_string());
            }
            Ok(Command::Submit(params))
        }
        "abandon" => Ok(Command::Abandon),
        "pending" => Ok(Command::Pending),
        "dismiss" => Ok(Command::Dismiss),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command {other:?}")),
    }
}
