//! Line-oriented command loop over the catalog services

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::{
    error::AppError,
    models::{book::EDITABLE_FIELDS, Book, CreateBook},
    services::Services,
};

const COMMANDS: &[&str] = &[
    "getAllRecords",
    "addBook",
    "removeBook",
    "editBook",
    "findByName",
    "checkout",
    "checkin",
    "history",
    "allHistory",
    "getAveragePrice",
    "getMedianPriceByGenre",
    "getMostPopularGenre",
    "getTopBooks",
    "getValueScores",
    "help",
    "exit",
];

#[derive(Debug, Error)]
enum ReplError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("end of input")]
    Eof,
}

type CommandResult = Result<(), ReplError>;

pub struct Repl<'a, R, W> {
    services: &'a Services,
    input: R,
    output: W,
    running: bool,
}

impl<'a, R: BufRead, W: Write> Repl<'a, R, W> {
    pub fn new(services: &'a Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
            running: true,
        }
    }

    /// Read and execute commands until `exit` or end of input.
    /// Only failures to read input or write output end the loop early.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Welcome to the book catalog! Type 'help' for a list of commands!"
        )?;
        while self.running {
            match self.prompt(">>> ") {
                Ok(cmd) => self.handle_command(&cmd)?,
                Err(ReplError::Io(e)) => return Err(e),
                Err(_) => self.running = false,
            }
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn handle_command(&mut self, cmd: &str) -> io::Result<()> {
        let result = match cmd {
            "" => Ok(()),
            "exit" => self.exit(),
            "help" => self.help(),
            "getAllRecords" => self.get_all_records(),
            "addBook" => self.add_book(),
            "removeBook" => self.remove_book(),
            "editBook" => self.edit_book(),
            "findByName" => self.find_by_name(),
            "checkout" => self.checkout(),
            "checkin" => self.checkin(),
            "history" => self.history(),
            "allHistory" => self.all_history(),
            "getAveragePrice" => self.average_price(),
            "getMedianPriceByGenre" => self.median_price_by_genre(),
            "getMostPopularGenre" => self.most_popular_genre(),
            "getTopBooks" => self.top_books(),
            "getValueScores" => self.value_scores(),
            other => {
                tracing::debug!(command = other, "Unknown command");
                writeln!(self.output, "Please use a valid command! Type 'help' for a list.")
                    .map_err(ReplError::from)
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(ReplError::App(e)) => {
                tracing::debug!(command = cmd, error = %e, "Command failed");
                writeln!(self.output, "{}", e.render())
            }
            Err(ReplError::Eof) => {
                self.running = false;
                Ok(())
            }
            Err(ReplError::Io(e)) => Err(e),
        }
    }

    fn prompt(&mut self, label: &str) -> Result<String, ReplError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(ReplError::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn print_books(&mut self, books: &[Book]) -> CommandResult {
        for book in books {
            writeln!(self.output, "{}", book)?;
        }
        Ok(())
    }

    fn exit(&mut self) -> CommandResult {
        self.running = false;
        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    fn help(&mut self) -> CommandResult {
        writeln!(self.output, "Available commands: {}", COMMANDS.join(", "))?;
        Ok(())
    }

    fn get_all_records(&mut self) -> CommandResult {
        let books = self.services.catalog.list_books()?;
        if books.is_empty() {
            writeln!(self.output, "The catalog is empty.")?;
        }
        self.print_books(&books)
    }

    fn add_book(&mut self) -> CommandResult {
        writeln!(self.output, "Enter Book Details:")?;
        let title = self.prompt("Title: ")?;
        let author = self.prompt("Author: ")?;
        let id = self.services.catalog.add_book(CreateBook::new(&title, &author))?;
        writeln!(self.output, "Added book {}", id)?;
        Ok(())
    }

    fn remove_book(&mut self) -> CommandResult {
        let book_id = self.prompt("Book ID: ")?;
        let book = self.services.catalog.remove_book(&book_id)?;
        writeln!(self.output, "Book '{}' removed.", book.title)?;
        Ok(())
    }

    /// Pick a single book by title, asking for the id when several share it
    fn select_by_title(&mut self) -> Result<Option<Book>, ReplError> {
        let title = self.prompt("Book Title: ")?;
        let mut matches = self.services.catalog.find_by_title(&title)?;
        match matches.len() {
            0 => {
                writeln!(self.output, "No book titled '{}'.", title)?;
                Ok(None)
            }
            1 => Ok(matches.pop()),
            _ => {
                self.print_books(&matches)?;
                let book_id = self.prompt("Several books share that title. Book ID: ")?;
                Ok(Some(self.services.catalog.get_book(&book_id)?))
            }
        }
    }

    fn edit_book(&mut self) -> CommandResult {
        let Some(book) = self.select_by_title()? else {
            return Ok(());
        };
        writeln!(self.output, "{}", serde_json::to_string_pretty(&book).map_err(AppError::from)?)?;
        writeln!(self.output, "Editable fields: {}", EDITABLE_FIELDS.join(", "))?;

        let mut field = self.prompt("Choose your field: ")?;
        while !EDITABLE_FIELDS.contains(&field.as_str()) {
            field = self.prompt("===Invalid Entry===, Choose a different field: ")?;
        }
        let value = self.prompt(&format!("{} Change To: ", field))?;

        let updated = self.services.catalog.edit_book(&book.book_id, &field, &value)?;
        writeln!(
            self.output,
            "Successfully changed {}'s {} to: {}",
            updated.title, field, value
        )?;
        Ok(())
    }

    fn find_by_name(&mut self) -> CommandResult {
        let title = self.prompt("Please enter book name: ")?;
        let books = self.services.catalog.find_by_title(&title)?;
        if books.is_empty() {
            writeln!(self.output, "No book titled '{}'.", title)?;
        }
        self.print_books(&books)
    }

    fn checkout(&mut self) -> CommandResult {
        let book_id = self.prompt("Book ID: ")?;
        let receipt = self.services.checkouts.checkout(&book_id)?;
        writeln!(self.output, "{}", receipt)?;
        Ok(())
    }

    fn checkin(&mut self) -> CommandResult {
        let book_id = self.prompt("Book ID: ")?;
        let receipt = self.services.checkouts.checkin(&book_id)?;
        writeln!(self.output, "{}", receipt)?;
        Ok(())
    }

    fn history(&mut self) -> CommandResult {
        let book_id = self.prompt("Book ID: ")?;
        let records = self.services.checkouts.history_for_book(&book_id)?;
        if records.is_empty() {
            writeln!(self.output, "No checkouts recorded for book {}.", book_id)?;
        }
        for record in records {
            writeln!(self.output, "{}", record)?;
        }
        Ok(())
    }

    fn all_history(&mut self) -> CommandResult {
        let records = self.services.checkouts.all_history()?;
        if records.is_empty() {
            writeln!(self.output, "No checkouts recorded.")?;
        }
        for record in records {
            writeln!(self.output, "{}", record)?;
        }
        Ok(())
    }

    fn average_price(&mut self) -> CommandResult {
        let books = self.services.catalog.list_books()?;
        match self.services.analytics.average_price(&books) {
            Some(avg) => writeln!(self.output, "Average price: ${}", avg.round_dp(2))?,
            None => writeln!(self.output, "No priced books.")?,
        }
        Ok(())
    }

    fn median_price_by_genre(&mut self) -> CommandResult {
        let books = self.services.catalog.list_books()?;
        let medians = self.services.analytics.median_price_by_genre(&books);
        if medians.is_empty() {
            writeln!(self.output, "No priced books with a genre.")?;
        }
        for (genre, median) in medians {
            writeln!(self.output, "genre {}: ${}", genre, median.round_dp(2))?;
        }
        Ok(())
    }

    fn most_popular_genre(&mut self) -> CommandResult {
        let raw = self.prompt("Publication year: ")?;
        let year: i32 = raw
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid year: '{}'", raw)))?;
        let books = self.services.catalog.list_books()?;
        match self.services.analytics.most_popular_genre(&books, year) {
            Some(genre) => writeln!(self.output, "Most popular genre in {}: {}", year, genre)?,
            None => writeln!(self.output, "No books published in {}.", year)?,
        }
        Ok(())
    }

    fn top_books(&mut self) -> CommandResult {
        let books = self.services.catalog.list_books()?;
        let top = self.services.analytics.top_rated_default(&books);
        for (rank, book) in top.iter().enumerate() {
            let rating = book.average_rating.unwrap_or_default();
            writeln!(self.output, "{:>2}. {:.2}  {}", rank + 1, rating, book)?;
        }
        Ok(())
    }

    fn value_scores(&mut self) -> CommandResult {
        let books = self.services.catalog.list_books()?;
        for (book_id, score) in self.services.analytics.value_scores_default(&books) {
            writeln!(self.output, "{}: {:.3}", book_id, score)?;
        }
        Ok(())
    }
}
