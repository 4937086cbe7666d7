//! Canned reply text for the FAQ chat widget. Replies are HTML fragments the
//! widget injects directly; `{name}` is substituted with the caller's name.

pub const EMPTY_PROMPT: &str =
    "I'd love to help! Could you tell me what you'd like to know about our chess coaching? ♟️";

pub const GREETINGS: &[&str] = &[
    "Hi {name}! 👋 How can I assist you with your chess journey today? ♟️",
    "Hello {name}! Ready to improve your chess skills? What would you like to know?",
    "Hey {name}! ♟️ Welcome back. How can I help you today?",
    "Namaste {name}! 🙏 How can I assist with your chess learning?",
];

pub const STUDENT_GREETINGS: &[&str] = &[
    "Welcome back, {name}! 👑 How's your chess practice going?",
    "Hi {name}! Ready for today's chess session? What can I help you with?",
    "Hey {name}! Great to see you again. How can I assist you today?",
];

pub const FAREWELLS: &[&str] = &[
    "Happy to help! Feel free to ask anything else about chess coaching. Goodbye! 👋",
    "Glad I could assist! Come back anytime for more chess guidance. ♟️",
    "All the best with your chess journey, {name}! Let me know if you need anything else.",
    "Take care {name}! Keep those chess pieces moving! 👋",
];

pub const THINKING_PHRASES: &[&str] = &[
    "Let me check that for you...",
    "Consulting my chess knowledge...",
    "One moment while I find that information...",
    "Good question! Let me pull up the details...",
];

pub const ENCOURAGEMENTS: &[&str] = &[
    "That's a great question! 🎯",
    "Excellent thinking! 🧠",
    "You're asking all the right questions! 👍",
];

pub const SMALL_TALK: &[&str] = &[
    "I'm doing great, {name}! 😊 Always ready to talk chess. ♟️ What's on your mind?",
    "I'm excellent! Chess strategy keeps my circuits buzzing. ⚡ How can I help you today?",
    "Doing well, thanks for asking! 👍 Ready to assist with anything chess-related.",
];

pub const IDENTITY: &[&str] = &[
    "I'm the Rookery Chess Academy assistant! 🤖♟️<br><br>\
     I can help you with:<br>\
     • Batch schedules and timings ⏰<br>\
     • Fee structure and payment details 💰<br>\
     • Tournament information 🏆<br>\
     • The enrollment process 📝<br><br>\
     Think of me as your friendly guide to everything chess coaching! 😊",
    "Hi {name}! 👋 I'm an assistant built for Rookery Chess Academy.<br><br>\
     My job is to answer questions about our coaching — batches, fees, \
     tournaments, or how to join. I'm always here to help!",
];

pub const ABOUT: &str = "🏆 <strong>About Rookery Chess Academy</strong> 🏆<br><br>\
    We're a chess coaching family! 🙏<br><br>\
    <strong>Our Legacy:</strong><br>\
    • <strong>10+ years</strong> of chess education 📅<br>\
    • <strong>800+ students</strong> trained 👨‍🎓<br>\
    • <strong>4.9★ rating</strong> from happy reviews ⭐<br><br>\
    <strong>What Makes Us Special:</strong><br>\
    ✨ <em>Personalized Coaching</em> — tailored strategies for each student<br>\
    ✨ <em>Comprehensive Resources</em> — PDFs, books, and study materials 📚<br>\
    ✨ <em>Weekly Tournaments</em> — regular competitive practice 🏅<br><br>\
    Want to know about our batches or how to join? 😊";

pub const INSTRUCTOR: &str = "👨‍🏫 <strong>Meet Our Head Coach</strong> 👑<br><br>\
    With over 10 years of teaching experience, our head coach has guided \
    hundreds of students from beginners to tournament winners. 🏆<br><br>\
    <strong>Teaching Style:</strong><br>\
    • Patient and encouraging<br>\
    • Focused on individual student needs<br>\
    • Comprehensive study materials 📚<br>\
    • A friendly, supportive environment 🤝<br><br>\
    Want to learn under expert guidance? Ask me about enrollment! 😊";

pub const BATCHES_STUDENT: &str = "Hey {name}! 👋 Here are our batch options:<br><br>\
    📍 <strong>Offline Classes</strong> 🏢<br>\
    • Advanced Group: Tue, Thu, Sat (5PM – 8PM) ⭐<br>\
    • Intermediate Group: Mon, Wed, Fri (5PM – 8PM) 🎯<br><br>\
    💻 <strong>Online Live Sessions</strong> 🌐<br>\
    • Morning Batch: Mon, Wed, Fri (10AM – 11AM) ☀️<br>\
    • Evening Batch: Tue, Thu, Sat (6PM – 7PM) 🌙<br><br>\
    Need to switch batches? Reach the academy on WhatsApp! 📞";

pub const BATCHES_GUEST: &str = "♟️ <strong>Our Chess Class Batches</strong> ⏰<br><br>\
    📍 <strong>Offline Coaching</strong> 🏢<br>\
    • <em>Beginner Batch</em>: Mon, Wed, Fri (4PM – 5PM) 🌱<br>\
    • <em>Intermediate Batch</em>: Tue, Thu, Sat (5PM – 6:30PM) 🎯<br>\
    • <em>Advanced Batch</em>: Tue, Thu, Sat (6:30PM – 8PM) ⭐<br><br>\
    💻 <strong>Live Online Classes</strong> 🌐<br>\
    • <em>Batch A</em>: Tue, Thu, Sat (4PM – 5PM)<br>\
    • <em>Batch B</em>: Mon, Wed, Fri (6PM – 7PM)<br>\
    • <em>Weekend Intensive</em>: Sat, Sun (10AM – 12PM) 🚀<br><br>\
    Small batch sizes, interactive sessions, weekly progress tracking. \
    Which batch suits your schedule best? 😊";

pub const FEES: &str = "💰 <strong>Fee Structure</strong> 💸<br><br>\
    📅 <strong>Monthly Plan</strong><br>\
    • ₹3,000 per student 💵<br>\
    • All study materials included 📚<br>\
    • Sunday tournaments included 🏆<br><br>\
    🎯 <strong>Quarterly Plan (Most Popular! ⭐)</strong><br>\
    • ₹7,500 for 3 months 💰<br>\
    • All benefits included ✅<br><br>\
    💳 <strong>Payment Methods:</strong> UPI, GPay/PhonePe, cash at the center, \
    or bank transfer 🏦<br><br>\
    📌 Fees are payable in advance. After payment, the admin verifies the \
    details and allots your batch. ⏳";

pub const TOURNAMENTS: &str = "🏆 <strong>Weekly Chess Tournaments</strong> 🎮<br><br>\
    📅 <strong>Every Sunday</strong><br>\
    • Time: announced in the notices ⏰<br>\
    • Format: Swiss System (5 rounds) 🔄<br>\
    • Time Control: 3+2 minutes ⏱️<br>\
    • Entry Fee: <strong>FREE for enrolled students!</strong> 🎉<br>\
    • Prizes: trophies, certificates and chess books 🏅<br><br>\
    Real competitive experience, progress tracking, and chess friends. \
    Ready to play the next one? 🚀";

pub const ENROLLMENT: &str = "🎯 <strong>How to Join — Step by Step</strong> 📋<br><br>\
    1️⃣ <strong>Sign Up</strong> — register as a student on the website 📝<br>\
    2️⃣ <strong>Fee Payment</strong> — choose your plan (Monthly ₹3,000 or \
    Quarterly ₹7,500) and pay 💰<br>\
    3️⃣ <strong>Verification & Batch Allotment</strong> — the admin verifies \
    your payment and allots your batch ✅<br>\
    4️⃣ <strong>Start Learning</strong> — attend your first class and receive \
    study materials 🚀<br><br>\
    Ready to make your first move? ♟️ Start by signing up!";

pub const AGE: &str = "👨‍👩‍👧‍👦 <strong>Eligibility — Age Requirements</strong> 🎂<br><br>\
    We accept students aged <strong>5 to 25 years</strong>. 📅<br><br>\
    • <strong>Kids (5-12)</strong>: fun, game-based learning 🎮<br>\
    • <strong>Teens (13-18)</strong>: competitive training 🏆<br>\
    • <strong>Young Adults (19-25)</strong>: advanced coaching 🎓<br><br>\
    ✨ No prior chess experience needed — we teach complete beginners to \
    advanced players. How old are you? I can suggest the perfect batch! 😊";

pub const DASHBOARD: &str = "👋 Hi {name}! 😊<br><br>\
    For personal information like:<br><br>\
    • 📝 Homework assignments<br>\
    • 📈 Progress and rating<br>\
    • 💳 Fee payment status<br>\
    • 🏆 Tournament results<br><br>\
    please check your <strong>Student Dashboard</strong> — it has the live \
    picture. Is there anything else about our classes I can help with? 🤔";

pub const DISCOUNTS: &str = "💸 <strong>Fee Information</strong> 📋<br><br>\
    Our fee structure is:<br>\
    • Monthly: ₹3,000 💵<br>\
    • Quarterly: ₹7,500 💰<br><br>\
    Currently, <strong>no special discounts or offers are available</strong>. 🚫<br>\
    We keep pricing transparent to ensure quality coaching for all students. ✅";

pub const LOCATION: &str = "📍 <strong>Where to Find Us</strong> 🗺️<br><br>\
    Rookery Chess Academy ♟️<br>\
    Dharampeth, Nagpur 📍<br><br>\
    <strong>🚗 Easy to Reach:</strong> near the post office, ten minutes from \
    the railway station, parking available 🅿️<br><br>\
    Planning to visit? The center is open Mon-Sat, 4PM-8PM 😊⏰";

pub const JOKES: &[&str] = &[
    "Why did the chess piece go to therapy? 🤔<br>Because it had too many \
     checkered pasts! 😄<br><br>Now, let's get serious about your chess \
     learning — what would you like to know?",
    "What's a chess player's favorite game show? 🎯<br>Check or No Check! \
     😂<br><br>Speaking of checks, have you checked out our batch timings? ⏰",
];

pub const COMPLIMENTS: &[&str] = &[
    "Aww, thank you {name}! 🥰 That makes my circuits happy! ⚡ I'm here \
     anytime you need help with chess coaching.",
    "You're very kind! 🙏 I'm glad I could help. Feel free to ask anything \
     else about chess coaching!",
];

pub const CAPABILITIES: &str = "🤖 <strong>Here's How I Can Help!</strong> 🎯<br><br>\
    🕐 <strong>Class Information</strong> — batch timings, online vs offline, \
    age groups<br>\
    💰 <strong>Fees & Payment</strong> — plans, payment methods, the \
    verification process<br>\
    📝 <strong>Enrollment</strong> — how to join, registration steps<br>\
    🏆 <strong>Tournaments</strong> — the weekly Sunday tournament<br>\
    📞 <strong>Contact & Location</strong> — address and center timings<br><br>\
    Just ask me anything about chess coaching! What would you like to know \
    first? 🤔";

pub const FALLBACK_SUGGESTIONS: &[&str] = &[
    "Try asking: <strong>What are the batch timings?</strong> ⏰",
    "You can ask: <strong>How much are the fees?</strong> 💰",
    "How about: <strong>How do I register as a student?</strong> 📝",
    "Curious about: <strong>What age groups do you teach?</strong> 👶👨",
];

pub const EGG_ACTIVATED: &str =
    "Are gudia the greatest pagal?! 😱🤯 Bapre me bat nahi kar sakta! 🚫🗣️";

pub const EGG_WARNING: &str =
    "Bola na bat nahi kar sakta! 😡🤐 One more message and... ⏳💥";

pub const EGG_BOOM: &str = "💥 BOLAAAA NA!!! BAT NAHI KAR SAKTA!!! 💥<br><br>\
    🔒 Chat is closing automatically...<br><br>😉 PS: IYKYK";

pub const ERROR_REPLIES: &[&str] = &[
    "⚡ Oops! I hit a small glitch. ⚠️ Could you please try asking again? 🔄",
    "🔧 Technical hiccup on my end! ⚙️ Please rephrase your question or try \
     again in a moment. ⏳",
];
