//! # Help Text
//!
//! Help messages for the two personas.
//! Displayed to the user via the `/help` command.

pub const MUSIC: &str = concat!(
    "**🎵 Music Bot Help**\n",
    "Use: /command _args_\n",
    "\n",
    "* play [url or search]: Play a song or add it to the queue\n",
    "* pause: Pause the current song\n",
    "* resume: Resume the current song\n",
    "* skip: Skip to the next song\n",
    "* stop: Clear the queue\n",
    "* queue: Show the queue\n",
    "* now_playing (np): Show the current song\n",
    "\n",
    "⚠️ **Note:** Voice chat playback is currently disabled. ",
    "The bot can search for songs and manage the queue, but cannot play audio.\n"
);

pub const REPORT: &str = concat!(
    "**🚨 Report Bot Help**\n",
    "Use: /command _args_\n",
    "\n",
    "* report user [user_id] [reason]\n",
    "* report message [chat_id:message_id] [reason]\n",
    "* report channel [channel_id] [reason]\n",
    "* status [report_id]: Check one of your reports\n"
);
