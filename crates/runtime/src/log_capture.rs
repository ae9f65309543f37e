//! In-memory log sink for asserting on emitted events.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
	/// Routes every event on this thread into the buffer until the guard drops.
	pub(crate) fn install(&self) -> DefaultGuard {
		let sink = self.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::TRACE)
			.with_ansi(false)
			.with_writer(move || sink.clone())
			.finish();
		tracing::subscriber::set_default(subscriber)
	}

	pub(crate) fn contents(&self) -> String {
		let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
		String::from_utf8_lossy(&buf).into_owned()
	}

	/// Lines containing `needle`, in emission order.
	pub(crate) fn lines_with(&self, needle: &str) -> Vec<String> {
		self.contents().lines().filter(|l| l.contains(needle)).map(str::to_string).collect()
	}
}

impl io::Write for CapturedLogs {
	fn write(&mut self, data: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap_or_else(|e| e.into_inner()).extend_from_slice(data);
		Ok(data.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
